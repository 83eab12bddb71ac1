//! Listing queries: raw parameters become a [`Filter`] and [`QueryOptions`],
//! and [`execute`] turns both into a [`ListingPage`].

mod executor;
mod filter;
mod options;

pub use executor::{execute, ListingError, ListingPage};
pub use filter::{Filter, FilterBuilder, TextSearch, CONTROL_PARAMS};
pub use options::{
    Projection, QueryError, QueryOptions, SortOrder, Window, DEFAULT_LIMIT, DEFAULT_PAGE,
};
