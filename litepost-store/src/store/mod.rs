mod trait_store;

pub use trait_store::{Storage, StoreError};
