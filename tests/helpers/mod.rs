pub mod recording_publisher;
pub mod test_data_builder;
