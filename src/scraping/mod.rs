// Web scraping module for extracting headline text from news pages

pub mod headlines;

pub use headlines::{fetch_html, select_text, HeadlineScraper, HeadlineSource};
