//! Scoped input listener lifetime
//!
//! Listeners are held in an `Attachment`; detaching is idempotent and
//! happens on drop, so repeated start/stop cycles never leak handlers.

/// A resource that can be released exactly once
pub trait Release {
    fn release(self);
}

/// Owns an attached resource until it is detached or dropped
#[derive(Debug)]
pub struct Attachment<R: Release> {
    resource: Option<R>,
}

impl<R: Release> Attachment<R> {
    pub fn attach(resource: R) -> Self {
        Self {
            resource: Some(resource),
        }
    }

    /// An attachment holding nothing
    pub fn empty() -> Self {
        Self { resource: None }
    }

    pub fn is_attached(&self) -> bool {
        self.resource.is_some()
    }

    /// Release the resource. Safe to call any number of times.
    pub fn detach(&mut self) {
        if let Some(resource) = self.resource.take() {
            resource.release();
        }
    }

    /// Swap in a new resource, releasing the previous one first
    pub fn replace(&mut self, resource: R) {
        self.detach();
        self.resource = Some(resource);
    }
}

impl<R: Release> Default for Attachment<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R: Release> Drop for Attachment<R> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::KeyboardListeners;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{EventTarget, KeyboardEvent};

    use super::Release;
    use crate::input::InputState;

    type KeyClosure = Closure<dyn FnMut(KeyboardEvent)>;

    /// keydown/keyup handlers registered on one event target
    pub struct KeyboardListeners {
        target: EventTarget,
        key_down: KeyClosure,
        key_up: KeyClosure,
    }

    impl KeyboardListeners {
        /// Register handlers writing into `input`
        pub fn register(
            target: EventTarget,
            input: Rc<RefCell<InputState>>,
        ) -> Result<Self, JsValue> {
            let down_input = input.clone();
            let key_down = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if down_input.borrow_mut().key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let key_up = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                input.borrow_mut().key_up(&event.code());
            });

            target.add_event_listener_with_callback("keydown", key_down.as_ref().unchecked_ref())?;
            target.add_event_listener_with_callback("keyup", key_up.as_ref().unchecked_ref())?;

            Ok(Self {
                target,
                key_down,
                key_up,
            })
        }
    }

    impl Release for KeyboardListeners {
        fn release(self) {
            let _ = self
                .target
                .remove_event_listener_with_callback("keydown", self.key_down.as_ref().unchecked_ref());
            let _ = self
                .target
                .remove_event_listener_with_callback("keyup", self.key_up.as_ref().unchecked_ref());
            log::debug!("Keyboard listeners released");
        }
    }
}
