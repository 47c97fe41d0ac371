//! Manga Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MangaError {
    #[error("Invalid title: {0}")]
    InvalidTitle(&'static str),

    #[error("Invalid image payload: {0}")]
    InvalidImage(String),

    #[error("Invalid bubble id: {0}")]
    InvalidBubbleId(&'static str),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid reading order: {0}")]
    InvalidReadingOrder(i64),
}
