use async_trait::async_trait;
use client::{Camera, CameraError, CameraId, Facing};

/// Stands in for a device camera. Decoded payloads are typed at the prompt.
pub struct ConsoleCamera {
    cameras: Vec<CameraId>,
    running: Option<Facing>,
}

impl ConsoleCamera {
    pub fn new(cameras: Vec<CameraId>) -> Self {
        Self {
            cameras: cameras
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
            running: None,
        }
    }
}

#[async_trait]
impl Camera for ConsoleCamera {
    async fn list_cameras(&mut self) -> Result<Vec<CameraId>, CameraError> {
        if self.cameras.is_empty() {
            return Err(CameraError::Unavailable("no camera configured".to_string()));
        }

        Ok(self.cameras.clone())
    }

    async fn start(&mut self, facing: Facing) -> Result<(), CameraError> {
        self.running = Some(facing);
        println!("[camera {facing} on] type the decoded text, :close to stop");

        Ok(())
    }

    async fn next_payload(&mut self) -> Option<String> {
        None
    }

    fn stop(&mut self) {
        if self.running.take().is_some() {
            println!("[camera off]");
        }
    }
}
