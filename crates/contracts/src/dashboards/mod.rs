pub mod d405_records_summary;
