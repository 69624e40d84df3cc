//! Cart Repositories

pub(crate) mod carts;
pub(crate) mod items;

pub(crate) use carts::PgCartsRepository;
pub(crate) use items::PgCartItemsRepository;
