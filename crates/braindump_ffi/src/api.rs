//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the process-wide app context, capture workflow and nudge board.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every failure is reported through a response envelope (`ok=false`).
//! - The state lock is never held across an `.await`.

use braindump_core::config::Settings;
use braindump_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    tasks_view, wins_view, AnalysisOutcome, AppContext, CaptureState, CaptureWorkflow,
    Categorization, Categorizer, GeminiClient, Item, LibraryQuery, NudgeBoard, NudgeClient,
    NudgeFrequency, Palette, PreferencesPatch, ProfilePatch, QueryInput, TextModel, UserProfile,
};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

static APP_STATE: Mutex<Option<AppState>> = Mutex::new(None);

struct AppState {
    db_path: PathBuf,
    context: AppContext,
    capture: CaptureWorkflow,
    nudge: NudgeBoard,
    categorizer: Categorizer,
    nudges: NudgeClient,
}

impl AppState {
    fn open(db_path: PathBuf, settings: &Settings) -> Result<Self, String> {
        let context = AppContext::open_at(&db_path)
            .map_err(|err| format!("app context open failed: {err}"))?;
        let model: Arc<dyn TextModel> = Arc::new(
            GeminiClient::new(&settings.ai).map_err(|err| format!("model client init failed: {err}"))?,
        );
        info!(
            "event=app_init module=ffi status=ok items={} model={}",
            context.items().len(),
            model.description()
        );
        Ok(Self {
            db_path,
            context,
            capture: CaptureWorkflow::new(),
            nudge: NudgeBoard::default(),
            categorizer: Categorizer::new(Arc::clone(&model)),
            nudges: NudgeClient::new(model),
        })
    }
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), Path::new(log_dir.trim())) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Opens the app database at `db_path` and restores persisted state.
///
/// Settings (model, API key) come from the settings file and environment;
/// `db_path` overrides the configured database location.
///
/// # FFI contract
/// - Idempotent for the same path; a different path is rejected.
/// - Other calls lazily initialize from settings when this was not called.
#[flutter_rust_bridge::frb(sync)]
pub fn init_app(db_path: String) -> ActionResponse {
    let db_path = PathBuf::from(db_path.trim());
    if db_path.as_os_str().is_empty() {
        return ActionResponse::failure("init_app failed: db_path cannot be empty");
    }

    let mut guard = match APP_STATE.lock() {
        Ok(guard) => guard,
        Err(_) => return ActionResponse::failure("init_app failed: app state lock poisoned"),
    };
    if let Some(state) = guard.as_ref() {
        if state.db_path == db_path {
            return ActionResponse::done("App already initialized.");
        }
        return ActionResponse::failure(format!(
            "init_app failed: already initialized at `{}`",
            state.db_path.display()
        ));
    }

    let result = load_settings().and_then(|settings| AppState::open(db_path, &settings));
    match result {
        Ok(state) => {
            *guard = Some(state);
            ActionResponse::done("App initialized.")
        }
        Err(err) => {
            error!("event=app_init module=ffi status=error error={err}");
            ActionResponse::failure(format!("init_app failed: {err}"))
        }
    }
}

/// Item projection exposed to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDto {
    pub id: String,
    /// `task|idea|win|note`.
    pub kind: String,
    pub content: String,
    pub title: String,
    pub category: String,
    pub timestamp: i64,
    pub completed: bool,
    /// `low|medium|high` when set.
    pub priority: Option<String>,
    pub tags: Vec<String>,
}

impl From<&Item> for ItemDto {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            kind: item.kind.as_str().to_string(),
            content: item.content.clone(),
            title: item.title.clone(),
            category: item.category.clone(),
            timestamp: item.timestamp,
            completed: item.completed,
            priority: item.priority.map(|priority| priority.as_str().to_string()),
            tags: item.tags.clone(),
        }
    }
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Affected item, when the action targets one.
    pub item_id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, item_id: String) -> Self {
        Self {
            ok: true,
            item_id: Some(item_id),
            message: message.into(),
        }
    }

    fn done(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            item_id: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item_id: None,
            message: message.into(),
        }
    }
}

/// Library filter input. Unset or empty fields mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryQueryInput {
    /// `task|idea|win|note`; `None` or `all` matches every type.
    pub kind: Option<String>,
    /// `all|pending|completed`.
    pub status: Option<String>,
    pub search: String,
    /// Inclusive `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive `YYYY-MM-DD`.
    pub end_date: Option<String>,
    /// `date-desc|date-asc|alphabetical|priority`.
    pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListResponse {
    pub ok: bool,
    pub items: Vec<ItemDto>,
    /// Size of the whole collection before filtering.
    pub total_count: u32,
    pub message: String,
}

/// Returns the filtered, sorted Library view.
///
/// # FFI contract
/// - Sync call over in-memory state.
/// - Invalid filter values fail the whole call.
#[flutter_rust_bridge::frb(sync)]
pub fn library_items(query: LibraryQueryInput) -> ItemListResponse {
    let parsed = match parse_library_query(&query) {
        Ok(parsed) => parsed,
        Err(err) => return ItemListResponse::failure(format!("library_items failed: {err}")),
    };

    let result = with_state(|state| {
        let all = state.context.items().items();
        let matched = braindump_core::apply_library_query(all, &parsed);
        Ok((matched, all.len()))
    });
    match result {
        Ok((matched, total)) => ItemListResponse {
            ok: true,
            message: if matched.is_empty() {
                "No items.".to_string()
            } else {
                format!("Found {} item(s).", matched.len())
            },
            items: matched.iter().map(ItemDto::from).collect(),
            total_count: saturating_u32(total),
        },
        Err(err) => ItemListResponse::failure(format!("library_items failed: {err}")),
    }
}

impl ItemListResponse {
    fn failure(message: String) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            total_count: 0,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksResponse {
    pub ok: bool,
    /// First pending tasks in store order.
    pub pending: Vec<ItemDto>,
    pub pending_total: u32,
    pub completed: Vec<ItemDto>,
    /// Current nudge text.
    pub nudge: String,
    pub nudge_loading: bool,
    pub message: String,
}

/// Returns the Tasks (home) view data.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_overview() -> TasksResponse {
    let result = with_state(|state| {
        let view = tasks_view(state.context.items().items());
        Ok(TasksResponse {
            ok: true,
            pending: view.pending.iter().map(ItemDto::from).collect(),
            pending_total: saturating_u32(view.pending_total),
            completed: view.completed.iter().map(ItemDto::from).collect(),
            nudge: state.nudge.message().to_string(),
            nudge_loading: state.nudge.is_loading(),
            message: String::new(),
        })
    });
    result.unwrap_or_else(|err| TasksResponse {
        ok: false,
        pending: Vec::new(),
        pending_total: 0,
        completed: Vec::new(),
        nudge: String::new(),
        nudge_loading: false,
        message: format!("tasks_overview failed: {err}"),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinsResponse {
    pub ok: bool,
    pub total: u32,
    pub recent: Vec<ItemDto>,
    pub message: String,
}

/// Returns the Wins view data.
#[flutter_rust_bridge::frb(sync)]
pub fn wins_overview() -> WinsResponse {
    let result = with_state(|state| {
        let view = wins_view(state.context.items().items());
        Ok(WinsResponse {
            ok: true,
            total: saturating_u32(view.total),
            recent: view.recent.iter().map(ItemDto::from).collect(),
            message: String::new(),
        })
    });
    result.unwrap_or_else(|err| WinsResponse {
        ok: false,
        total: 0,
        recent: Vec::new(),
        message: format!("wins_overview failed: {err}"),
    })
}

/// Flips the completion flag of one item.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_item(item_id: String) -> ActionResponse {
    let result = with_state(|state| {
        state
            .context
            .items_mut()
            .toggle_completed(item_id.trim())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(true) => ActionResponse::success("Item completed.", item_id),
        Ok(false) => ActionResponse::success("Item reopened.", item_id),
        Err(err) => ActionResponse::failure(format!("toggle_item failed: {err}")),
    }
}

/// Permanently removes one item.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_item(item_id: String) -> ActionResponse {
    let result = with_state(|state| {
        state
            .context
            .items_mut()
            .delete(item_id.trim())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(removed) => ActionResponse::success("Item deleted.", removed.id),
        Err(err) => ActionResponse::failure(format!("delete_item failed: {err}")),
    }
}

/// Profile projection exposed to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDto {
    pub name: String,
    pub avatar: String,
    pub streak: u32,
    pub total_wins: u32,
    /// `default|earthy|ocean|midnight`.
    pub palette: String,
    pub notifications_enabled: bool,
    /// `low|medium|high`.
    pub nudge_frequency: String,
    pub ai_context: String,
}

impl From<&UserProfile> for ProfileDto {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            avatar: profile.avatar.clone(),
            streak: profile.streak,
            total_wins: profile.total_wins,
            palette: profile.preferences.palette.as_str().to_string(),
            notifications_enabled: profile.preferences.notifications_enabled,
            nudge_frequency: profile.preferences.nudge_frequency.as_str().to_string(),
            ai_context: profile.preferences.ai_context.clone(),
        }
    }
}

/// Partial profile update. `None` fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdateInput {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub streak: Option<u32>,
    pub total_wins: Option<u32>,
    pub palette: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub nudge_frequency: Option<String>,
    pub ai_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileResponse {
    pub ok: bool,
    pub profile: Option<ProfileDto>,
    pub message: String,
}

impl ProfileResponse {
    fn failure(message: String) -> Self {
        Self {
            ok: false,
            profile: None,
            message,
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn profile_get() -> ProfileResponse {
    match with_state(|state| Ok(ProfileDto::from(state.context.profile().profile()))) {
        Ok(profile) => ProfileResponse {
            ok: true,
            profile: Some(profile),
            message: String::new(),
        },
        Err(err) => ProfileResponse::failure(format!("profile_get failed: {err}")),
    }
}

/// Merges `update` into the profile and persists it.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_update(update: ProfileUpdateInput) -> ProfileResponse {
    let patch = match parse_profile_update(update) {
        Ok(patch) => patch,
        Err(err) => return ProfileResponse::failure(format!("profile_update failed: {err}")),
    };
    match with_state(|state| Ok(ProfileDto::from(state.context.profile_mut().update(&patch)))) {
        Ok(profile) => ProfileResponse {
            ok: true,
            profile: Some(profile),
            message: "Profile saved.".to_string(),
        },
        Err(err) => ProfileResponse::failure(format!("profile_update failed: {err}")),
    }
}

/// Categorization shown on the review card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizationDto {
    pub title: String,
    pub kind: String,
    pub category: String,
    pub tags: Vec<String>,
    pub priority: Option<String>,
}

impl From<&Categorization> for CategorizationDto {
    fn from(value: &Categorization) -> Self {
        Self {
            title: value.title.clone(),
            kind: value.kind.as_str().to_string(),
            category: value.category.clone(),
            tags: value.tags.clone(),
            priority: value.priority.map(|priority| priority.as_str().to_string()),
        }
    }
}

/// Capture workflow snapshot after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResponse {
    pub ok: bool,
    /// `input|processing|review|success`.
    pub state: String,
    /// Text currently held by the input (empty after success or fallback).
    pub text: String,
    pub categorization: Option<CategorizationDto>,
    /// Committed item, after publish or fallback.
    pub item_id: Option<String>,
    /// View to navigate to once the success delay elapses.
    pub destination: Option<String>,
    /// Delay before navigating to `destination`.
    pub advance_delay_ms: u32,
    pub message: String,
}

impl CaptureResponse {
    fn from_workflow(workflow: &CaptureWorkflow, message: impl Into<String>) -> Self {
        let (categorization, item_id, destination) = match workflow.state() {
            CaptureState::Review { categorization, .. } => {
                (Some(CategorizationDto::from(categorization)), None, None)
            }
            CaptureState::Success { item, destination } => (
                None,
                Some(item.id.clone()),
                Some(destination.as_str().to_string()),
            ),
            CaptureState::Input { .. } | CaptureState::Processing { .. } => (None, None, None),
        };
        Self {
            ok: true,
            state: workflow.state().name().to_string(),
            text: workflow.text().to_string(),
            categorization,
            item_id,
            destination,
            advance_delay_ms: advance_delay_ms(),
            message: message.into(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            ok: false,
            state: String::new(),
            text: String::new(),
            categorization: None,
            item_id: None,
            destination: None,
            advance_delay_ms: advance_delay_ms(),
            message,
        }
    }
}

/// Returns the current capture state without changing it.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_state() -> CaptureResponse {
    with_state(|state| Ok(CaptureResponse::from_workflow(&state.capture, "")))
        .unwrap_or_else(|err| CaptureResponse::failure(format!("capture_state failed: {err}")))
}

/// Submits `text` for categorization.
///
/// On success the workflow waits in `review`. When categorization fails the
/// text is saved as an uncategorized note and the input is cleared.
///
/// # FFI contract
/// - Async call; performs one network request at most.
/// - Blank text is rejected without a request.
pub async fn capture_analyze(text: String) -> CaptureResponse {
    let prepared = with_state(|state| {
        if matches!(state.capture.state(), CaptureState::Success { .. }) {
            state.capture.reset();
        }
        state.capture.set_text(text).map_err(|err| err.to_string())?;
        let ticket = state.capture.begin_analysis().map_err(|err| err.to_string())?;
        Ok((ticket, state.categorizer.clone(), state.context.ai_context()))
    });
    let (ticket, categorizer, context) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => return CaptureResponse::failure(format!("capture_analyze failed: {err}")),
    };

    let result = categorizer.categorize(ticket.text(), context.as_deref()).await;

    let applied = with_state(|state| {
        let outcome = state
            .capture
            .complete_analysis(ticket, result, state.context.items_mut())
            .map_err(|err| err.to_string())?;
        Ok(match outcome {
            AnalysisOutcome::Review => {
                CaptureResponse::from_workflow(&state.capture, "Ready for review.")
            }
            AnalysisOutcome::FallbackSaved {
                item_id,
                destination,
            } => CaptureResponse {
                item_id: Some(item_id),
                destination: Some(destination.as_str().to_string()),
                ..CaptureResponse::from_workflow(
                    &state.capture,
                    "Categorization unavailable; saved as an unsorted note.",
                )
            },
            AnalysisOutcome::Stale => {
                CaptureResponse::from_workflow(&state.capture, "Capture changed; result ignored.")
            }
        })
    });
    applied.unwrap_or_else(|err| CaptureResponse::failure(format!("capture_analyze failed: {err}")))
}

/// Commits the reviewed categorization as a new item.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_publish() -> CaptureResponse {
    with_state(|state| {
        state
            .capture
            .publish(state.context.items_mut())
            .map_err(|err| err.to_string())?;
        Ok(CaptureResponse::from_workflow(&state.capture, "Item saved."))
    })
    .unwrap_or_else(|err| CaptureResponse::failure(format!("capture_publish failed: {err}")))
}

/// Drops the reviewed categorization and returns to editing the same text.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_discard() -> CaptureResponse {
    with_state(|state| {
        state.capture.discard().map_err(|err| err.to_string())?;
        Ok(CaptureResponse::from_workflow(&state.capture, "Review discarded."))
    })
    .unwrap_or_else(|err| CaptureResponse::failure(format!("capture_discard failed: {err}")))
}

/// Leaves the success state for a fresh, empty input.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_reset() -> CaptureResponse {
    with_state(|state| {
        state.capture.reset();
        Ok(CaptureResponse::from_workflow(&state.capture, ""))
    })
    .unwrap_or_else(|err| CaptureResponse::failure(format!("capture_reset failed: {err}")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NudgeResponse {
    pub ok: bool,
    pub message: String,
    /// Whether the refresh replaced the previous message.
    pub changed: bool,
}

/// Regenerates the Tasks nudge from current pending tasks.
///
/// # FFI contract
/// - Async call; at most one network request.
/// - A failed refresh keeps the previous message and still returns `ok=true`.
pub async fn refresh_nudge() -> NudgeResponse {
    let prepared = with_state(|state| {
        state.nudge.begin_refresh();
        Ok((
            state.nudges.clone(),
            state.context.items().items().to_vec(),
            state.context.ai_context(),
        ))
    });
    let (client, items, context) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => {
            return NudgeResponse {
                ok: false,
                message: format!("refresh_nudge failed: {err}"),
                changed: false,
            }
        }
    };

    let result = client.generate(&items, context.as_deref()).await;

    with_state(|state| {
        let changed = state.nudge.finish_refresh(result);
        Ok(NudgeResponse {
            ok: true,
            message: state.nudge.message().to_string(),
            changed,
        })
    })
    .unwrap_or_else(|err| NudgeResponse {
        ok: false,
        message: format!("refresh_nudge failed: {err}"),
        changed: false,
    })
}

fn with_state<T>(f: impl FnOnce(&mut AppState) -> Result<T, String>) -> Result<T, String> {
    let mut guard = APP_STATE
        .lock()
        .map_err(|_| "app state lock poisoned".to_string())?;
    if guard.is_none() {
        let settings = load_settings()?;
        *guard = Some(AppState::open(settings.db_path(), &settings)?);
    }
    match guard.as_mut() {
        Some(state) => f(state),
        None => Err("app state unavailable".to_string()),
    }
}

fn load_settings() -> Result<Settings, String> {
    Settings::load(None).map_err(|err| err.to_string())
}

fn parse_library_query(input: &LibraryQueryInput) -> Result<LibraryQuery, String> {
    LibraryQuery::parse(QueryInput {
        kind: input.kind.as_deref(),
        status: input.status.as_deref(),
        search: Some(input.search.as_str()),
        start: input.start_date.as_deref(),
        end: input.end_date.as_deref(),
        sort: input.sort.as_deref(),
    })
    .map_err(|err| err.to_string())
}

fn parse_profile_update(input: ProfileUpdateInput) -> Result<ProfilePatch, String> {
    let palette = non_blank(input.palette.as_deref())
        .map(|value| Palette::parse(value).ok_or_else(|| format!("unknown palette `{value}`")))
        .transpose()?;
    let nudge_frequency = non_blank(input.nudge_frequency.as_deref())
        .map(|value| {
            NudgeFrequency::parse(value).ok_or_else(|| format!("unknown nudge frequency `{value}`"))
        })
        .transpose()?;

    Ok(ProfilePatch {
        name: input.name,
        avatar: input.avatar,
        streak: input.streak,
        total_wins: input.total_wins,
        preferences: Some(PreferencesPatch {
            palette,
            notifications_enabled: input.notifications_enabled,
            nudge_frequency,
            ai_context: input.ai_context,
        }),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn advance_delay_ms() -> u32 {
    u32::try_from(braindump_core::SUCCESS_ADVANCE_DELAY.as_millis()).unwrap_or(u32::MAX)
}
