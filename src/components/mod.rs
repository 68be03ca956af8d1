//! Reusable views.

pub mod family_tree;
