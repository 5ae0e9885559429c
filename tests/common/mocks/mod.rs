//! Scripted stand-ins for the voice sink and the stream provider, so
//! engine behavior can be exercised without Discord or the network.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serenity::async_trait;
use serenity::model::id::ChannelId;
use songbird::input::{File, Input};

use turntable::commands::music::audio_sources::stream_provider::{StreamProvider, StreamStrategy};
use turntable::commands::music::audio_sources::track::Track;
use turntable::commands::music::utils::playback_engine::{MusicError, MusicResult};
use turntable::commands::music::utils::voice_sink::AudioSink;

/// A lazy input that nothing ever drives; playback is never started for
/// real in these tests.
pub fn dummy_input() -> Input {
    File::new("/dev/null").into()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCommand {
    Bind(ChannelId),
    Play(u64),
    Pause,
    Resume,
    Stop,
    Release,
}

/// Shared record of everything the engine asked the sink to do.
#[derive(Default, Clone)]
pub struct SinkLog(Arc<Mutex<Vec<SinkCommand>>>);

impl SinkLog {
    pub fn commands(&self) -> Vec<SinkCommand> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, wanted: impl Fn(&SinkCommand) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|c| wanted(c)).count()
    }

    pub fn plays(&self) -> usize {
        self.count(|c| matches!(c, SinkCommand::Play(_)))
    }

    pub fn releases(&self) -> usize {
        self.count(|c| matches!(c, SinkCommand::Release))
    }

    fn push(&self, command: SinkCommand) {
        self.0.lock().unwrap().push(command);
    }
}

pub struct FakeSink {
    log: SinkLog,
    bound: Option<ChannelId>,
    fail_bind: bool,
}

impl FakeSink {
    pub fn new() -> (Box<Self>, SinkLog) {
        let log = SinkLog::default();
        (
            Box::new(Self {
                log: log.clone(),
                bound: None,
                fail_bind: false,
            }),
            log,
        )
    }

    /// A sink whose join always fails, for voice-error paths.
    pub fn failing_bind() -> (Box<Self>, SinkLog) {
        let (mut sink, log) = Self::new();
        sink.fail_bind = true;
        (sink, log)
    }
}

#[async_trait]
impl AudioSink for FakeSink {
    async fn bind(&mut self, channel: ChannelId) -> MusicResult<()> {
        if self.fail_bind {
            return Err(MusicError::JoinError("scripted join failure".to_string()));
        }
        self.log.push(SinkCommand::Bind(channel));
        self.bound = Some(channel);
        Ok(())
    }

    fn bound_channel(&self) -> Option<ChannelId> {
        self.bound
    }

    async fn play(&mut self, _input: Input, generation: u64) -> MusicResult<()> {
        self.log.push(SinkCommand::Play(generation));
        Ok(())
    }

    async fn pause(&mut self) -> MusicResult<()> {
        self.log.push(SinkCommand::Pause);
        Ok(())
    }

    async fn resume(&mut self) -> MusicResult<()> {
        self.log.push(SinkCommand::Resume);
        Ok(())
    }

    async fn stop(&mut self) {
        self.log.push(SinkCommand::Stop);
    }

    async fn release(&mut self) {
        self.log.push(SinkCommand::Release);
        self.bound = None;
    }
}

/// Stream provider scripted per locator: listed locators are unplayable,
/// everything else opens. Records every open request in order.
pub struct FakeProvider {
    unplayable: HashSet<String>,
    fail_all: bool,
    opened: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn always_ok() -> Arc<Self> {
        Arc::new(Self {
            unplayable: HashSet::new(),
            fail_all: false,
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn always_failing() -> Arc<Self> {
        Arc::new(Self {
            unplayable: HashSet::new(),
            fail_all: true,
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_urls(urls: impl IntoIterator<Item = String>) -> Arc<Self> {
        Arc::new(Self {
            unplayable: urls.into_iter().collect(),
            fail_all: false,
            opened: Mutex::new(Vec::new()),
        })
    }

    /// Locators requested so far, in request order.
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl StreamProvider for FakeProvider {
    async fn open_stream(&self, track: &Track) -> MusicResult<Input> {
        self.opened.lock().unwrap().push(track.url.clone());
        if self.fail_all || self.unplayable.contains(&track.url) {
            return Err(MusicError::Unplayable(format!(
                "{}: scripted failure",
                track.title
            )));
        }
        Ok(dummy_input())
    }
}

/// A fallback-chain rung with a scripted outcome and a call counter.
pub struct CountingStrategy {
    name: &'static str,
    succeed: bool,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl CountingStrategy {
    pub fn failing(name: &'static str) -> (Box<Self>, Arc<AtomicUsize>) {
        Self::build(name, false, None)
    }

    pub fn succeeding(name: &'static str) -> (Box<Self>, Arc<AtomicUsize>) {
        Self::build(name, true, None)
    }

    /// Succeeds, but only after sleeping; used to exercise the per-attempt
    /// timeout.
    pub fn sleeping(name: &'static str, delay: Duration) -> (Box<Self>, Arc<AtomicUsize>) {
        Self::build(name, true, Some(delay))
    }

    fn build(
        name: &'static str,
        succeed: bool,
        delay: Option<Duration>,
    ) -> (Box<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(Self {
                name,
                succeed,
                delay,
                calls: Arc::clone(&calls),
            }),
            calls,
        )
    }
}

#[async_trait]
impl StreamStrategy for CountingStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn open(&self, _track: &Track) -> MusicResult<Input> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.succeed {
            Ok(dummy_input())
        } else {
            Err(MusicError::AudioSourceError(format!(
                "scripted failure in '{}'",
                self.name
            )))
        }
    }
}
