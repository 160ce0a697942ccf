pub mod dataset;

pub use dataset::{
    DataSource, DatasetError, FileDataSource, HttpDataSource, StaticDataSource, source_for,
};
