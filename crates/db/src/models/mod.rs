pub mod catalog_entry;
