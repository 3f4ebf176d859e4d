use std::{
    io::{stdout, Write},
    time::Duration,
};
use tokio::{sync::oneshot, task::JoinHandle, time};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TICK: Duration = Duration::from_millis(100);

pub struct Spinner {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Animate `text` on the current line until `finish` is awaited; the
/// line is erased afterwards so command output starts clean.
pub fn spin(text: &str) -> Spinner {
    let text = text.to_string();
    let (stop, mut stopped) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let mut interval = time::interval(TICK);
        let mut frame = 0usize;
        loop {
            tokio::select! {
                _ = &mut stopped => break,
                _ = interval.tick() => {
                    print!("\r{} {}", FRAMES[frame % FRAMES.len()], text);
                    let _ = stdout().flush();
                    frame += 1;
                }
            }
        }
        print!("\r{}\r", " ".repeat(text.chars().count() + 2));
        let _ = stdout().flush();
    });
    Spinner { stop, task }
}

impl Spinner {
    pub async fn finish(self) {
        let _ = self.stop.send(());
        let _ = self.task.await;
    }
}
