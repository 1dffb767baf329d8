pub mod three_body;
