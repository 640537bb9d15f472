use std::time::Duration;

use eframe::{egui, Frame};
use egui::{Context, RichText};

use log::warn;
use reqwest::blocking::Client;
use reqwest::Result;

const SERVER: &str = "http://127.0.0.1:5000";

/// Shown when the server cannot give its own greeting.
const FALLBACK_GREETING: &str = "Olá! Não consegui falar com o servidor ainda.";

/// Who wrote a chat line.
#[derive(Debug, PartialEq, Clone, Copy)]
enum Sender {
    User,
    Bot,
}

/// One line of the chat history.
#[derive(Debug, Clone)]
struct Message {
    sender: Sender,
    text: String,
}

/// REST context holding a reusable blocking HTTP client.
struct RESTContext {
    client: Client,
}

impl RESTContext {
    /// Creates a new REST context with a timeout.
    fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::new(5, 0))
            .build()?;
        Ok(Self { client })
    }

    /// Sends a POST request to `/v1/respond` with the message as body.
    fn post_respond(&self, message: &str) -> Result<String> {
        let response = self.client
            .post(format!("{SERVER}/v1/respond"))
            .body(message.to_owned())
            .send()?
            .error_for_status()?;

        Ok(response.text()?)
    }

    /// Sends a GET request to `/v1/generate`, seeded by the current draft.
    fn get_generated(&self, seed: &str) -> Result<String> {
        let mut request = self.client.get(format!("{SERVER}/v1/generate"));
        if !seed.is_empty() {
            request = request.query(&[("seed", seed)]);
        }
        Ok(request.send()?.error_for_status()?.text()?)
    }

    /// Sends a POST request to `/v1/reset`.
    fn post_reset(&self) -> Result<String> {
        let response = self.client
            .post(format!("{SERVER}/v1/reset"))
            .send()?
            .error_for_status()?;

        Ok(response.text()?)
    }

    /// Sends a GET request to `/v1/greeting`.
    fn get_greeting(&self) -> Result<String> {
        let response = self.client
            .get(format!("{SERVER}/v1/greeting"))
            .send()?
            .error_for_status()?;

        Ok(response.text()?)
    }
}

/// Global UI state (MUST persist between frames in egui).
struct ChatUI {
    rest: RESTContext,
    history: Vec<Message>,
    draft: String,
}

impl ChatUI {
    /// Initializes the UI and asks the server for its greeting.
    fn new() -> Result<Self> {
        let rest = RESTContext::new()?;
        let greeting = rest.get_greeting().unwrap_or_else(|e| {
            warn!("Greeting request failed: {e}");
            FALLBACK_GREETING.to_owned()
        });
        let mut chat = Self {
            rest,
            history: Vec::new(),
            draft: String::new(),
        };
        chat.display(Sender::Bot, greeting);
        Ok(chat)
    }

    fn display(&mut self, sender: Sender, text: String) {
        self.history.push(Message { sender, text });
    }

    /// Sends the draft and displays both sides of the exchange.
    fn send(&mut self) {
        let message = self.draft.trim().to_owned();
        if message.is_empty() {
            return;
        }
        self.draft.clear();

        let reply = match self.rest.post_respond(&message) {
            Ok(reply) => reply,
            Err(e) => format!("Error: {e}"),
        };
        self.display(Sender::User, message);
        self.display(Sender::Bot, reply);
    }

    /// Free generation seeded by the draft (forward chain only).
    fn generate(&mut self) {
        let seed = self.draft.trim().to_owned();
        let text = match self.rest.get_generated(&seed) {
            Ok(text) => text,
            Err(e) => format!("Error: {e}"),
        };
        self.display(Sender::Bot, text);
    }

    /// Clears the chat and the server memory.
    fn reset(&mut self) {
        let ack = match self.rest.post_reset() {
            Ok(ack) => ack,
            Err(e) => format!("Error: {e}"),
        };
        self.history.clear();
        self.display(Sender::Bot, ack);
    }
}

impl eframe::App for ChatUI {
    /// UI update loop (called every frame).
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        egui::TopBottomPanel::bottom("message_form").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let input = ui.add_sized(
                    [260.0, 24.0],
                    egui::TextEdit::singleline(&mut self.draft).hint_text("Digite sua mensagem"),
                );
                let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if ui.button("Enviar").clicked() || submitted {
                    self.send();
                    input.request_focus();
                }
                if ui.button("Gerar").clicked() {
                    self.generate();
                }
                if ui.button("Reiniciar").clicked() {
                    self.reset();
                }
            });
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for message in &self.history {
                        match message.sender {
                            Sender::User => {
                                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                                    ui.label(RichText::new(&message.text).strong());
                                });
                            }
                            Sender::Bot => {
                                ui.label(&message.text);
                            }
                        }
                        ui.add_space(4.0);
                    }
                });
        });
    }
}

/// Application entry point.
fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([440.0, 520.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "rs-markov-chat",
        options,
        Box::new(|_| Ok(Box::new(ChatUI::new()?))),
    )
}
