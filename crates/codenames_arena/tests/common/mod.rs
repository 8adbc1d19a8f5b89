//! Shared fixtures for orchestrator tests.
//!
//! The board is fixed: ALPHA..INDIA red (A1..D2), JULIET..QUEBEC blue,
//! ROMEO..XRAY neutral, YANKEE the assassin (E5). Red starts.

#![allow(dead_code)]

use async_trait::async_trait;
use codenames_arena::{
    Agent, AgentError, EventSink, INTERACTION_TARGET, MatchEvent, MatchLimits, Orchestrator, Role,
    Roster, SamplingParams, StandardPrompts,
};
use codenames_rules::{Board, CardCategory, Game, Team};
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer};

pub const WORDS: [&str; 25] = [
    "ALPHA", "BRAVO", "CHARLIE", "DELTA", "ECHO", "FOXTROT", "GOLF", "HOTEL", "INDIA", "JULIET",
    "KILO", "LIMA", "MIKE", "NOVEMBER", "OSCAR", "PAPA", "QUEBEC", "ROMEO", "SIERRA", "TANGO",
    "UNIFORM", "VICTOR", "WHISKEY", "XRAY", "YANKEE",
];

pub fn board() -> Board {
    let words = WORDS.iter().map(|w| w.to_string()).collect();
    let mut categories = vec![CardCategory::Agent(Team::Red); 9];
    categories.extend([CardCategory::Agent(Team::Blue); 8]);
    categories.extend([CardCategory::Neutral; 7]);
    categories.push(CardCategory::Assassin);
    Board::from_words(words, categories).expect("valid board")
}

/// One scripted agent reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
}

pub fn clue(word: &str, number: i64) -> Reply {
    Reply::Text(json!({"clue": word, "number": number, "reasoning": "scripted"}).to_string())
}

pub fn guess(word: &str) -> Reply {
    Reply::Text(json!({"action": "guess", "word": word, "reasoning": "scripted"}).to_string())
}

pub fn end() -> Reply {
    Reply::Text(json!({"action": "end", "word": null, "reasoning": "done"}).to_string())
}

pub fn text(raw: &str) -> Reply {
    Reply::Text(raw.to_string())
}

pub fn fail(message: &str) -> Reply {
    Reply::Fail(message.to_string())
}

/// Replays queued replies, then the fallback forever, and records every prompt.
pub struct ScriptedAgent {
    script: Mutex<VecDeque<Reply>>,
    fallback: Option<Reply>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedAgent {
    pub fn new(script: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn repeating(script: Vec<Reply>, fallback: Reply) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: Some(fallback),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn invoke(
        &self,
        user_prompt: &str,
        _system_prompt: &str,
        _sampling: &SamplingParams,
    ) -> Result<String, AgentError> {
        self.prompts.lock().unwrap().push(user_prompt.to_string());
        let next = self.script.lock().unwrap().pop_front();
        match next.or_else(|| self.fallback.clone()) {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(AgentError::new(message)),
            None => Err(AgentError::new("script exhausted")),
        }
    }
}

/// Keeps every event in emission order.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<MatchEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<MatchEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn types(&self) -> Vec<&'static str> {
        self.events().iter().map(MatchEvent::event_type).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &MatchEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// The four seats of a match.
pub struct Table {
    pub red_spymaster: Arc<ScriptedAgent>,
    pub red_operative: Arc<ScriptedAgent>,
    pub blue_spymaster: Arc<ScriptedAgent>,
    pub blue_operative: Arc<ScriptedAgent>,
}

impl Table {
    /// Blue seats have no script, so a blue turn aborts the match.
    pub fn red_only(red_spymaster: Arc<ScriptedAgent>, red_operative: Arc<ScriptedAgent>) -> Self {
        Self {
            red_spymaster,
            red_operative,
            blue_spymaster: ScriptedAgent::new(Vec::new()),
            blue_operative: ScriptedAgent::new(Vec::new()),
        }
    }

    pub fn roster(&self) -> Roster {
        Roster::from_factory(
            SamplingParams::spymaster(),
            SamplingParams::operative(),
            |team, role| {
                let agent = match (team, role) {
                    (Team::Red, Role::Spymaster) => &self.red_spymaster,
                    (Team::Red, Role::Operative) => &self.red_operative,
                    (Team::Blue, Role::Spymaster) => &self.blue_spymaster,
                    (Team::Blue, Role::Operative) => &self.blue_operative,
                };
                agent.clone() as Arc<dyn Agent>
            },
        )
    }

    pub fn orchestrator(&self, sink: Arc<RecordingSink>, limits: MatchLimits) -> Orchestrator {
        Orchestrator::new(
            Game::new(board(), Team::Red),
            self.roster(),
            sink,
            Arc::new(StandardPrompts),
            limits,
        )
    }
}

/// Collects the fields of every agent interaction record.
#[derive(Clone, Default)]
pub struct InteractionLog {
    records: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl InteractionLog {
    pub fn records(&self) -> Vec<HashMap<String, String>> {
        self.records.lock().unwrap().clone()
    }
}

struct FieldMap<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldMap<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S: tracing::Subscriber> Layer<S> for InteractionLog {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != INTERACTION_TARGET {
            return;
        }
        let mut fields = HashMap::new();
        event.record(&mut FieldMap(&mut fields));
        self.records.lock().unwrap().push(fields);
    }
}
