pub mod guests_archive;
pub mod prod_db;
pub mod supabase;
pub mod visitors_table;
