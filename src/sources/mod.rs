pub(crate) mod images;
pub(crate) mod quotes;
