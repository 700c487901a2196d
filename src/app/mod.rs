pub mod feed_service;
