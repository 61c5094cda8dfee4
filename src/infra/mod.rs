// External storage backends

pub mod sqlite_store;
