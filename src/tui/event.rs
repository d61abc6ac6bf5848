use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::app::{Result, XcliError};

pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Terminal input and a redraw tick as one async source.
pub struct EventHandler {
    stream: EventStream,
    tick: Interval,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let mut tick = interval(tick_rate);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            stream: EventStream::new(),
            tick,
        }
    }

    pub async fn next(&mut self) -> Result<AppEvent> {
        loop {
            tokio::select! {
                maybe = self.stream.next() => match maybe {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        return Ok(AppEvent::Key(key));
                    }
                    Some(Ok(Event::Resize(_, _))) => return Ok(AppEvent::Resize),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                    None => return Err(XcliError::Other("terminal input closed".into())),
                },
                _ = self.tick.tick() => return Ok(AppEvent::Tick),
            }
        }
    }
}

/// What a key means while browsing a list or a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Back,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    Select,
    MarkRead,
    OpenInBrowser,
    None,
}

/// What a key means in the draft editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    Quit,
    Cancel,
    Commit,
    AttachImage,
    Backspace,
    CursorLeft,
    CursorRight,
    Insert(char),
    None,
}
