//! Catalog Repositories

pub(crate) mod categories;
pub(crate) mod products;

pub(crate) use categories::PgCategoriesRepository;
pub(crate) use products::PgProductsRepository;
