use crate::notify::{Field, FieldSet};
use crate::slider::{Slider, SliderState};
use serialport::SerialPort;
use std::io::{Read, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A slider that several callers can hold at once.
///
/// The transport and the state sit behind one lock, so at most one device
/// interaction is in flight and no caller sees a half-applied update.
pub struct SharedSlider<S = Box<dyn SerialPort>> {
    inner: Arc<Mutex<Slider<S>>>,
}

impl<S> Clone for SharedSlider<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Read + Write> SharedSlider<S> {
    pub fn new(slider: Slider<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(slider)),
        }
    }

    /// Hold the lock for a sequence of operations.
    ///
    /// A panic in another holder does not leave the state half-written, so a
    /// poisoned lock is taken over as is.
    pub fn lock(&self) -> MutexGuard<'_, Slider<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, observer: impl FnMut(Field, &SliderState) + Send + 'static) {
        self.lock().subscribe(observer);
    }

    pub fn forward(&self) -> FieldSet {
        self.lock().forward()
    }

    pub fn backward(&self) -> FieldSet {
        self.lock().backward()
    }

    pub fn reset(&self) -> FieldSet {
        self.lock().reset()
    }

    pub fn get_position(&self) -> usize {
        self.lock().get_position()
    }

    pub fn set_position(&self, index: i64) -> FieldSet {
        self.lock().set_position(index)
    }

    pub fn get_filter(&self) -> String {
        self.lock().get_filter().to_string()
    }

    pub fn set_filter(&self, name: &str) -> FieldSet {
        self.lock().set_filter(name)
    }

    pub fn get_filter_list(&self) -> Vec<String> {
        self.lock().get_filter_list().to_vec()
    }

    pub fn rename_filter(&self, index: i64, new_name: &str) -> FieldSet {
        self.lock().rename_filter(index, new_name)
    }

    pub fn get_status(&self) -> String {
        self.lock().get_status().to_string()
    }

    pub fn get_console(&self) -> String {
        self.lock().get_console().to_string()
    }

    pub fn refresh_status(&self) -> FieldSet {
        self.lock().refresh_status()
    }

    pub fn snapshot(&self) -> SliderState {
        self.lock().state().clone()
    }
}
