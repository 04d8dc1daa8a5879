use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore, SemaphorePermit};
use tokio::time::Instant;

const WINDOW: Duration = Duration::from_secs(60);

/// Caps outbound model traffic on two axes: concurrent in-flight requests
/// (semaphore) and requests per minute (sliding window). `acquire` queues
/// until both caps admit the call; the gateway itself never rejects.
pub struct RequestBudget {
    max_rpm: usize,
    semaphore: Semaphore,
    window: Mutex<VecDeque<Instant>>,
}

pub struct BudgetPermit<'a> {
    _permit: SemaphorePermit<'a>,
}

impl RequestBudget {
    #[must_use]
    pub fn new(max_rpm: usize, max_concurrent: usize) -> Self {
        Self {
            max_rpm: max_rpm.max(1),
            semaphore: Semaphore::new(max_concurrent.max(1)),
            window: Mutex::new(VecDeque::new()),
        }
    }

    pub async fn acquire(&self) -> BudgetPermit<'_> {
        // The semaphore is never closed, so acquire can only fail on a bug.
        let permit = self.semaphore.acquire().await.expect("request budget semaphore closed");

        loop {
            let wait = {
                let mut window = self.window.lock().await;
                let now = Instant::now();
                while window.front().is_some_and(|start| now.duration_since(*start) >= WINDOW) {
                    window.pop_front();
                }
                if window.len() < self.max_rpm {
                    window.push_back(now);
                    None
                } else {
                    // Front entry is the oldest request still inside the window.
                    window
                        .front()
                        .map(|start| WINDOW.saturating_sub(now.duration_since(*start)))
                }
            };

            match wait {
                None => return BudgetPermit { _permit: permit },
                Some(wait) => tokio::time::sleep(wait).await,
            }
        }
    }
}
