use clap::ValueEnum;

use crate::filesystem::TreeOrder;

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum PrintOrder {
    /// Children in the order they were added
    #[default]
    Insertion,
    /// Sub-directories before files at every level
    DirectoriesFirst,
}

impl PrintOrder {
    pub fn to_tree_order(self) -> TreeOrder {
        match self {
            PrintOrder::Insertion => TreeOrder::Insertion,
            PrintOrder::DirectoriesFirst => TreeOrder::DirectoriesFirst,
        }
    }
}
