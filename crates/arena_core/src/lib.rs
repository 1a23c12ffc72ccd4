use async_trait::async_trait;
use futures::{stream::BoxStream, StreamExt};
use reqwest::{Client, Response};
use shared::{
    domain::JudgePreset,
    error::ApiErrorBody,
    protocol::{
        DebateRequest, DebateResponse, SaveDebateRequest, SaveDebateResponse, StreamRecord,
    },
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

pub mod archive;
pub mod error;
pub mod frame;
pub mod labels;
pub mod session;
pub mod stream;
pub mod tally;
pub mod timeline;
pub mod view;

pub use error::{FrameDecodeError, SessionError};
pub use session::{Applied, EventDispatcher, SessionState, SessionStatus, ViewRefresh};
pub use stream::{Pull, RecordStream};
pub use timeline::{assemble, TimelineItem};

const STREAM_PATH: &str = "api/debate/stream";
const START_PATH: &str = "api/debate/start";
const SAVE_PATH: &str = "api/debate/save";
const JUDGES_PATH: &str = "api/judges";

pub type ByteStream = BoxStream<'static, Result<Vec<u8>, reqwest::Error>>;

/// Receives the session after every applied record.
///
/// Called on the consuming task between reads; an implementation that awaits
/// delays the next read but never sees two records at once.
#[async_trait]
pub trait SessionView: Send {
    async fn refresh(&mut self, state: &SessionState, refresh: ViewRefresh);

    /// Called once when a `complete` record ends the session.
    async fn completed(&mut self, _state: &SessionState) {}

    /// Called once when the session fails. Never called on cancellation.
    async fn failed(&mut self, _message: &str) {}
}

/// Discards all view updates.
pub struct QuietView;

#[async_trait]
impl SessionView for QuietView {
    async fn refresh(&mut self, _: &SessionState, _: ViewRefresh) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Completed(SessionState),
    /// Stopped by the caller; carries whatever had been reconstructed.
    Cancelled(Option<SessionState>),
}

/// Single control loop: pull a record, apply it, refresh the view, repeat.
pub async fn drive_session<S, B, E, V>(
    records: &mut RecordStream<S>,
    dispatcher: &mut EventDispatcher,
    view: &mut V,
) -> Result<SessionOutcome, SessionError>
where
    S: futures::Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
    V: SessionView + ?Sized,
{
    let mut applied_records = 0usize;
    loop {
        let pulled = match records.next_record().await {
            Ok(pulled) => pulled,
            Err(err) => return Err(fail_session(dispatcher, view, err).await),
        };

        let raw = match pulled {
            Pull::Record(raw) => raw,
            Pull::Finished => {
                warn!(applied_records, "debate stream ended without a complete record");
                return Err(fail_session(dispatcher, view, SessionError::IncompleteStream).await);
            }
            Pull::Cancelled => {
                info!(applied_records, "debate stream cancelled by caller");
                dispatcher.abort();
                return Ok(SessionOutcome::Cancelled(dispatcher.state().cloned()));
            }
        };

        let kind = raw.kind.clone();
        let record = match StreamRecord::try_from(raw) {
            Ok(record) => record,
            Err(source) => {
                let err = SessionError::RecordShape { kind, source };
                return Err(fail_session(dispatcher, view, err).await);
            }
        };

        let applied = match dispatcher.apply(record) {
            Ok(applied) => applied,
            Err(err) => {
                // The dispatcher already recorded the failure on the state.
                view.failed(&err.to_string()).await;
                return Err(err);
            }
        };
        applied_records += 1;

        let Some(state) = dispatcher.state() else {
            continue;
        };
        if !applied.refresh.is_empty() {
            view.refresh(state, applied.refresh).await;
        }
        if applied.terminal {
            info!(
                applied_records,
                turns = state.transcript.len(),
                votes = state.judge_votes.len(),
                "debate complete"
            );
            view.completed(state).await;
            return Ok(SessionOutcome::Completed(state.clone()));
        }
    }
}

async fn fail_session<V: SessionView + ?Sized>(
    dispatcher: &mut EventDispatcher,
    view: &mut V,
    err: SessionError,
) -> SessionError {
    let message = err.to_string();
    dispatcher.fail(message.clone());
    view.failed(&message).await;
    err
}

pub struct ArenaClient {
    http: Client,
    base_url: Url,
}

impl ArenaClient {
    pub fn new(server_url: &str) -> Result<Self, SessionError> {
        Self::with_http_client(server_url, Client::new())
    }

    pub fn with_http_client(server_url: &str, http: Client) -> Result<Self, SessionError> {
        let trimmed = server_url.trim().trim_end_matches('/');
        let base_url = Url::parse(&format!("{trimmed}/")).map_err(|err| {
            SessionError::transport(format!("invalid server url '{server_url}': {err}"))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(SessionError::transport(format!(
                "server url must start with http:// or https://: {server_url}"
            )));
        }
        Ok(Self { http, base_url })
    }

    pub fn server_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, SessionError> {
        self.base_url
            .join(path)
            .map_err(|err| SessionError::transport(format!("invalid endpoint '{path}': {err}")))
    }

    /// Submits the request and returns the undecoded response body as a
    /// record stream.
    pub async fn open_stream(
        &self,
        request: &DebateRequest,
        cancel: CancellationToken,
    ) -> Result<RecordStream<ByteStream>, SessionError> {
        let response = self
            .http
            .post(self.endpoint(STREAM_PATH)?)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();
        Ok(RecordStream::new(body, cancel))
    }

    /// Runs a streamed debate to completion, cancellation, or failure.
    pub async fn run_debate<V>(
        &self,
        request: &DebateRequest,
        view: &mut V,
        cancel: CancellationToken,
    ) -> Result<SessionOutcome, SessionError>
    where
        V: SessionView + ?Sized,
    {
        request.validate()?;
        info!(
            topic = %request.topic,
            judges = request.judges.len(),
            server = %self.base_url,
            "starting debate stream"
        );

        let mut dispatcher = EventDispatcher::seeded(request);
        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("debate cancelled before the stream opened");
                dispatcher.abort();
                return Ok(SessionOutcome::Cancelled(dispatcher.into_state()));
            }
            opened = self.open_stream(request, cancel.clone()) => opened,
        };
        let mut records = match opened {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "debate stream could not be opened");
                return Err(fail_session(&mut dispatcher, view, err).await);
            }
        };

        drive_session(&mut records, &mut dispatcher, view).await
    }

    /// Runs a debate through the non-streaming endpoint. The full response
    /// goes through the same path as a streamed `complete` record.
    pub async fn run_debate_sync(
        &self,
        request: &DebateRequest,
    ) -> Result<SessionState, SessionError> {
        request.validate()?;
        info!(topic = %request.topic, "starting synchronous debate");
        let response = self
            .http
            .post(self.endpoint(START_PATH)?)
            .json(request)
            .send()
            .await?;
        let debate: DebateResponse = ensure_success(response).await?.json().await?;

        let mut dispatcher = EventDispatcher::seeded(request);
        dispatcher.complete(debate);
        dispatcher
            .into_state()
            .ok_or_else(|| SessionError::transport("debate server returned no session"))
    }

    /// Judge presets offered by the server; an unreachable or failing server
    /// yields an empty list.
    pub async fn judge_presets(&self) -> Vec<JudgePreset> {
        match self.fetch_judge_presets().await {
            Ok(presets) => presets,
            Err(err) => {
                warn!(error = %err, "failed to load judge presets");
                Vec::new()
            }
        }
    }

    async fn fetch_judge_presets(&self) -> Result<Vec<JudgePreset>, SessionError> {
        let response = self.http.get(self.endpoint(JUDGES_PATH)?).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// Asks the server to store the debate; returns the path it reports.
    pub async fn save_debate(
        &self,
        debate: &DebateResponse,
        filename: Option<&str>,
    ) -> Result<String, SessionError> {
        let filename = filename.map(str::trim).filter(|name| !name.is_empty());
        let response = self
            .http
            .post(self.endpoint(SAVE_PATH)?)
            .json(&SaveDebateRequest { debate, filename })
            .send()
            .await?;
        let saved: SaveDebateResponse = ensure_success(response).await?.json().await?;
        info!(path = %saved.path, "debate saved on server");
        Ok(saved.path)
    }
}

async fn ensure_success(response: Response) -> Result<Response, SessionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = ApiErrorBody::detail_from(&body)
        .unwrap_or_else(|| format!("debate server returned an error ({status})"));
    Err(SessionError::Transport {
        status: Some(status.as_u16()),
        message,
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
