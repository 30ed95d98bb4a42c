//! Observable values backed by `tokio::sync::watch`
//!
//! Every write goes through the watch sender, so readers on any task see a
//! consistent value and writers are serialized.

use tokio::sync::watch;

/// A value whose changes can be subscribed to
#[derive(Debug)]
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx }
    }

    /// Clone out the current value
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.tx.borrow().clone()
    }

    /// Read the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Replace the value. Subscribers are only woken if it actually changed.
    pub fn set(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        self.tx.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        })
    }

    /// Mutate in place. `f` returns whether subscribers should be notified.
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// A receiver that starts with the current value marked as seen
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_only_notifies_on_change() {
        let value = Observable::new(1);
        let rx = value.subscribe();

        assert!(!value.set(1));
        assert!(!rx.has_changed().unwrap());

        assert!(value.set(2));
        assert!(rx.has_changed().unwrap());
        assert_eq!(value.get(), 2);
    }

    #[test]
    fn test_update_without_subscribers() {
        let value = Observable::new(vec![1, 2]);
        value.update(|v| {
            v.push(3);
            true
        });
        assert_eq!(value.with(|v| v.len()), 3);
    }

    #[tokio::test]
    async fn test_subscriber_wakes_on_change() {
        let value = Observable::new(String::new());
        let mut rx = value.subscribe();

        value.set("Bond".to_string());
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "Bond");
    }
}
