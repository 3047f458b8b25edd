use actix_web::{web, App, HttpServer, HttpResponse, Result, middleware};
use actix_files::Files;
use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use crate::config::PlannerConfig;
use crate::conversation::{planning_summary_message, PlanningConversation, PlanningStep};
use crate::planning::{generate_planning, GeneratedPlanning, PlanningRequest};
use crate::store::BoundedStore;

const CONVERSATION_ID_KEY: &str = "conversation_id";

pub const MAX_STORED_PLANNINGS: usize = 256;
pub const MAX_CONVERSATIONS: usize = 1024;
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Shared server state.
///
/// Generated plannings and in-progress conversations both live here, each
/// capped and evicting the oldest entry first. A client's cookie session only
/// carries its conversation id.
pub struct AppState {
    pub plannings: Mutex<BoundedStore<GeneratedPlanning>>,
    pub conversations: Mutex<BoundedStore<PlanningConversation>>,
    pub clock: fn() -> NaiveDateTime,
    next_id: AtomicU64,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("server state unavailable"))
}

impl AppState {
    pub fn new() -> Self {
        Self::with_clock(local_now)
    }

    pub fn with_clock(clock: fn() -> NaiveDateTime) -> Self {
        Self::with_limits(clock, MAX_STORED_PLANNINGS, MAX_CONVERSATIONS)
    }

    pub fn with_limits(clock: fn() -> NaiveDateTime, max_plannings: usize, max_conversations: usize) -> Self {
        Self {
            plannings: Mutex::new(BoundedStore::new(max_plannings)),
            conversations: Mutex::new(BoundedStore::new(max_conversations)),
            clock,
            next_id: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Stores a planning under a server-unique id and returns the stored copy.
    /// Plannings generated within the same millisecond share a timestamp, so a
    /// sequence number is appended to it.
    fn store(&self, mut planning: GeneratedPlanning) -> Result<GeneratedPlanning> {
        planning.id = format!("{}-{}", planning.id, self.next_id());
        if let Some(evicted) = lock(&self.plannings)?.insert(planning.id.clone(), planning.clone()) {
            log::debug!("Evicted planning {}", evicted);
        }
        Ok(planning)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn bad_request(error: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "success": false,
        "error": error
    }))
}

#[derive(Deserialize)]
pub struct ChatRequest {
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    success: bool,
    message: String,
    planning_step: PlanningStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    planning: Option<GeneratedPlanning>,
}

// Planning generation endpoint
async fn create_planning(
    req: web::Json<PlanningRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    match generate_planning(&req, (state.clock)()) {
        Ok(planning) => {
            let planning = state.store(planning)?;
            Ok(HttpResponse::Ok().json(planning))
        }
        Err(e) => {
            log::info!("Rejected planning request: {}", e);
            Ok(bad_request(&e.to_string()))
        }
    }
}

// Stored planning lookup
async fn get_planning(
    id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let plannings = lock(&state.plannings)?;

    match plannings.get(id.as_str()) {
        Some(planning) => Ok(HttpResponse::Ok().json(planning)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "Planning not found"}))),
    }
}

// Conversational endpoint: advances this client's planning conversation
async fn chat(
    req: web::Json<ChatRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let message = req.message.trim();
    if message.is_empty() {
        return Ok(bad_request("Message is empty"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Ok(bad_request(&format!(
            "Message is too long (max {} characters)",
            MAX_MESSAGE_CHARS
        )));
    }

    let conversation_id = match session.get::<String>(CONVERSATION_ID_KEY)? {
        Some(id) => id,
        None => {
            let id = format!("conversation-{}", state.next_id());
            session.insert(CONVERSATION_ID_KEY, &id)?;
            id
        }
    };

    let now = (state.clock)();
    let conversation = lock(&state.conversations)?
        .get(&conversation_id)
        .cloned()
        .unwrap_or_default();
    log::debug!("Chat message received (planning in progress: {})", conversation.is_active());
    let (conversation, reply) = conversation.handle_message(message, now.date());

    let mut text = reply.message;
    let mut planning = None;

    if let Some(request) = reply.planning_data {
        match generate_planning(&request, now) {
            Ok(generated) => {
                let generated = state.store(generated)?;
                text.push_str("\n\n");
                text.push_str(&planning_summary_message(&generated));
                planning = Some(generated);
            }
            Err(e) => {
                log::warn!("Planning generation from chat failed: {}", e);
                text = "❌ Oups ! Une erreur est survenue lors de la génération. Peux-tu réessayer ?".to_string();
            }
        }
        // Collected data has been consumed either way
        lock(&state.conversations)?.remove(&conversation_id);
    } else if let Some(evicted) = lock(&state.conversations)?.insert(conversation_id, conversation) {
        log::debug!("Evicted conversation {}", evicted);
    }

    Ok(HttpResponse::Ok().json(ChatResponse {
        success: true,
        message: text,
        planning_step: reply.planning_step,
        planning,
    }))
}

async fn reset_chat(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    if let Some(id) = session.get::<String>(CONVERSATION_ID_KEY)? {
        lock(&state.conversations)?.remove(&id);
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

// HTML page handler
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Registers every API route and the chat page
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/planning", web::post().to(create_planning))
        .service(web::resource("/api/planning/{id}").route(web::get().to(get_planning)))
        .route("/api/chat", web::post().to(chat))
        .route("/api/chat/reset", web::post().to(reset_chat));
}

pub async fn start_server(config: PlannerConfig) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new());
    let key = config.cookie_key();
    let static_dir = config.static_dir.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .service(Files::new("/static", static_dir.clone()))
            .configure(configure_routes)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
