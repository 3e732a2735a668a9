//! Push-based stream plumbing shared by the collaborators and the synchronizer.

use std::sync::Mutex;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::stream::{BoxStream, Stream, StreamExt};
use futures::future;

use crate::navigator::Navigator;

/// Fans values out to every live subscriber.
///
/// Each subscriber gets its own unbounded queue, so a slow consumer never
/// loses values. Subscribers whose receiver was dropped are pruned on the
/// next send.
pub struct Broadcaster<T> {
    senders: Mutex<Vec<UnboundedSender<T>>>,
}

impl<T> Default for Broadcaster<T> {
    fn default() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Clone> Broadcaster<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every value sent after this call.
    pub fn subscribe(&self) -> UnboundedReceiver<T> {
        let (tx, rx) = mpsc::unbounded();
        self.senders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }

    pub fn send(&self, value: &T) {
        self.senders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|tx| tx.unbounded_send(value.clone()).is_ok());
    }

    /// Number of subscribers whose receiver is still alive.
    pub fn receiver_count(&self) -> usize {
        let mut senders = self.senders.lock().unwrap_or_else(|e| e.into_inner());
        senders.retain(|tx| !tx.is_closed());
        senders.len()
    }
}

/// Forward a value only when it differs from the last forwarded value.
pub fn distinct_until_changed<S>(stream: S) -> impl Stream<Item = S::Item>
where
    S: Stream,
    S::Item: PartialEq + Clone,
{
    stream
        .scan(None::<S::Item>, |last, item| {
            let changed = last.as_ref() != Some(&item);
            if changed {
                *last = Some(item.clone());
            }
            future::ready(Some(changed.then_some(item)))
        })
        .filter_map(future::ready)
}

/// Default location sequence: the resolved path of every completed
/// navigation, with consecutive duplicates removed.
///
/// The path is taken from the `End` event rather than read from the
/// navigator when the event is consumed, since several navigations may
/// complete before the consumer catches up.
pub fn url_state(navigator: &dyn Navigator) -> BoxStream<'static, String> {
    let paths = navigator
        .events()
        .filter_map(|event| future::ready(event.into_completed_url()));
    distinct_until_changed(paths).boxed()
}
