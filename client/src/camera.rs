//! # Camera
//!
//! The QR decoder is supplied by the platform. The session only needs to
//! enumerate cameras, start decoding in a facing mode, pull decoded payloads
//! and stop.
//!
//! The session holds at most one running camera and stops it on every exit
//! path: close, teardown, facing switch and successful decode.
use std::fmt;

use async_trait::async_trait;

use crate::error::CameraError;

pub type CameraId = String;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    /// Back camera.
    #[default]
    Environment,
    /// Front camera.
    User,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Self::Environment => Self::User,
            Self::User => Self::Environment,
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Environment => "environment",
            Self::User => "user",
        })
    }
}

#[async_trait]
pub trait Camera: Send {
    async fn list_cameras(&mut self) -> Result<Vec<CameraId>, CameraError>;

    async fn start(&mut self, facing: Facing) -> Result<(), CameraError>;

    /// Next decoded payload, `None` once the decoder has stopped.
    async fn next_payload(&mut self) -> Option<String>;

    fn stop(&mut self);
}

/// Scanner overlay state while it is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSession {
    pub active: bool,
    pub facing: Facing,
    pub cameras: Vec<CameraId>,
}

impl ScanSession {
    pub fn can_switch(&self) -> bool {
        self.cameras.len() > 1
    }
}
