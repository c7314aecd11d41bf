//! Hands-free command selection from face mesh landmarks.
//!
//! Each camera frame's landmarks drive a gaze-controlled pointer that moves
//! along a cross centered on the viewport; blinking while the pointer sits in
//! one of the command zones latches a selection. [`session::Session`] runs one
//! tick of that loop; everything else feeds it frames or draws its output.

pub mod blink;
pub mod camera;
pub mod config;
pub mod detector;
pub mod error;
pub mod font;
pub mod gaze;
pub mod hud;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod pointer;
pub mod replay;
pub mod selection;
pub mod session;
pub mod types;
pub mod zones;

#[cfg(test)]
mod gaze_tests;
