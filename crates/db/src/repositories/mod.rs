pub mod catalog_entry_repo;

pub use catalog_entry_repo::CatalogEntryRepo;
