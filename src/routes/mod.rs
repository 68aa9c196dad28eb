pub(crate) mod health;
pub(crate) mod news;
pub(crate) mod summarize;
