pub mod placed_entry;
