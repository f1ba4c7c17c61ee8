//! Hand landmarks and the gesture features derived from them.
//!
//! Landmark regression is done by an external model behind the [`landmark::HandLandmarker`] trait.
//! This module only handles what comes out of it: conversion into pixel space, simple features
//! like raised fingers and fingertip distances, and drawing overlays.

pub mod features;
pub mod landmark;
pub mod replay;
