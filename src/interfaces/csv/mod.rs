pub mod skin_writer;
