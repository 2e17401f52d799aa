use tabled::{
    Table, Tabled,
    settings::{Remove, Style, object::Rows},
};

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    /// Drop the column-name row.
    pub bare_rows: bool,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let mut table = Table::new(data);
        if self.bare_rows {
            table.with(Remove::row(Rows::first()));
        }

        table.with(Style::blank());
        table
    }
}
