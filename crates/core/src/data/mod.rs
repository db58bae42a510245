//! Dynamic-runtime value model
//!
//! This module contains the values a scripting runtime exchanges with the
//! bridge, including:
//! - DynamicValue: tagged union of scalars, text, arrays, dicts, lists, images
//! - DynamicArray: shaped numeric buffer with an array-ecosystem dtype
//! - DynamicImage: packed image with an imaging-library mode string
//! - DynamicMap: ordered feature-name mapping

pub mod array;
pub mod image;
pub mod value;

pub use array::{DType, DynamicArray, Element};
pub use image::{channels_for_mode, DynamicImage};
pub use value::{DynamicMap, DynamicStr, DynamicValue};
