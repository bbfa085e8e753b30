//! The [`Program`](crate::Program) event stream (section 6):
//! `beforeFileParse` / `afterFileParse` / `beforeProgramValidate` /
//! `afterProgramValidate` / `beforeFileTranspile` / `afterFileTranspile`.

/// One lifecycle event a [`crate::Program`] emits while loading, validating,
/// or transpiling files.
#[derive(Debug, Clone)]
pub enum Event {
    BeforeFileParse { logical_path: String },
    AfterFileParse { logical_path: String },
    BeforeProgramValidate,
    AfterProgramValidate { diagnostic_count: usize },
    BeforeFileTranspile { logical_path: String },
    AfterFileTranspile { logical_path: String },
}

type Listener = Box<dyn FnMut(&Event) + Send>;

/// Fans every [`Event`] a [`crate::Program`] emits out to whichever
/// listeners have subscribed, in subscription order. An embedding tool
/// subscribes to drive progress UI or incremental re-validation instead of
/// polling the program for state changes.
#[derive(Default)]
pub struct EventSink {
    listeners: Vec<Listener>,
}

impl EventSink {
    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: Event) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}
