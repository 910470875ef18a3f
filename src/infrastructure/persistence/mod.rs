pub mod csv_store;

pub use csv_store::{
    LABELED_DATASET_FILE, load_observations, raw_data_path, read_labeled_dataset,
    write_labeled_dataset, write_region_records,
};
