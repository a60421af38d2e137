/// Main application struct and event loop
use crate::TuiOptions;
use crate::actions::Action;
use crate::dispatcher::{ActionReceiver, Dispatcher};
use crate::effects::Effects;
use crate::keyboard;
use crate::node_tree::NodeTree;
use crate::stores::{AppLogsStore, PickerStore, UIStore};
use crate::ui::layout::RenderContext;
use crate::ui::popover::picker_props;
use crate::ui::{PickerPopover, render_layout};
use calpick_core::dates::now_local;
use calpick_core::{Locale, get_calpick_setting};
use chrono::NaiveDateTime;
use ratatui::crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// The main application structure following flux architecture
pub struct App {
    dispatcher: Dispatcher,

    ui_store: UIStore,

    picker_store: PickerStore,

    app_logs_store: AppLogsStore,

    effects: Effects,

    locale: Locale,

    block_weekends: bool,

    events_file: Option<PathBuf>,

    /// Nodes of every mounted widget
    tree: NodeTree,

    /// Mounted while the picker is open
    popover: Option<PickerPopover>,

    clock: fn() -> NaiveDateTime,

    tick_rate: Duration,
}

impl App {
    pub fn new(options: TuiOptions) -> Result<(Self, ActionReceiver), Box<dyn std::error::Error>> {
        let (dispatcher, rx) = Dispatcher::new();
        let action_receiver = ActionReceiver::new(rx);

        let log_buffer = crate::logger::init_memory_logger()?;

        let ui_store = UIStore::new();
        let picker_store = PickerStore::new(options.selected);
        let app_logs_store = AppLogsStore::new(log_buffer);
        let effects = Effects::new(dispatcher.clone());
        let tick_rate =
            Duration::from_millis(get_calpick_setting!(CALPICK_TICK_RATE_MS, usize) as u64);

        Ok((
            Self {
                dispatcher,
                ui_store,
                picker_store,
                app_logs_store,
                effects,
                locale: options.locale,
                block_weekends: options.block_weekends,
                events_file: options.events_file,
                tree: NodeTree::new(),
                popover: None,
                clock: now_local,
                tick_rate,
            },
            action_receiver,
        ))
    }

    /// Last selected timestamp
    pub fn selection(&self) -> Option<String> {
        self.picker_store.get_state().selection_string()
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut crate::tui::Tui,
        mut action_receiver: ActionReceiver,
    ) -> io::Result<()> {
        log::info!("calpick started with locale {}", self.locale.code());

        if let Some(path) = self.events_file.clone() {
            self.dispatcher.dispatch(Action::LoadEvents(path));
        }
        self.dispatcher.dispatch(Action::OpenPicker);

        loop {
            let ctx = RenderContext {
                locale: &self.locale,
                dispatcher: &self.dispatcher,
                block_weekends: self.block_weekends,
            };
            terminal.draw(|frame| {
                render_layout(
                    frame,
                    &self.ui_store,
                    &self.picker_store,
                    &self.app_logs_store,
                    self.popover.as_mut(),
                    &ctx,
                );
            })?;

            self.close_popover_without_focus();

            if self.ui_store.should_exit() {
                break;
            }

            tokio::select! {
                // Poll for keyboard and mouse events
                _ = tokio::time::sleep(self.tick_rate) => {
                    if event::poll(Duration::from_millis(0))? {
                        match event::read()? {
                            Event::Key(key_event) => {
                                // Only process key press events (not release)
                                if key_event.kind == KeyEventKind::Press {
                                    if let Some(action) = keyboard::handle_key_event(
                                        key_event,
                                        &self.ui_store,
                                        &self.picker_store,
                                    ) {
                                        self.dispatcher.dispatch(action);
                                    }
                                }
                            }
                            Event::Mouse(mouse_event) => {
                                if mouse_event.kind == MouseEventKind::Down(MouseButton::Left) {
                                    if let Some(action) = keyboard::handle_mouse_event(
                                        mouse_event,
                                        &self.picker_store,
                                    ) {
                                        self.dispatcher.dispatch(action);
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                }

                // Process actions from the dispatcher
                Some(action) = action_receiver.recv() => {
                    self.handle_action(&action);
                }
            }
        }

        Ok(())
    }

    /// The popover only lives while focus is inside it
    fn close_popover_without_focus(&mut self) {
        if self.popover.as_ref().is_some_and(|p| p.focus_left()) {
            log::debug!("Focus left the date picker, closing it");
            self.popover = None;
            self.dispatcher.dispatch(Action::ClosePicker);
        }
    }

    /// Handle an action by routing it to stores, the picker and effects
    fn handle_action(&mut self, action: &Action) {
        log::debug!("Handling action: {:?}", action);

        // Route to stores (reducers)
        self.ui_store.reduce(action);
        self.picker_store.reduce(action);
        self.app_logs_store.dispatch(action);

        self.update_popover(action);

        // Trigger side effects
        self.effects.handle(action);
    }

    fn update_popover(&mut self, action: &Action) {
        match action {
            Action::OpenPicker => {
                if self.popover.is_none() {
                    self.popover = Some(PickerPopover::open(self.tree.clone(), self.clock));
                }
            }
            Action::ClosePicker => {
                self.popover = None;
            }
            Action::PickerKey(key) => {
                if let Some(popover) = self.popover.as_mut() {
                    let state = self.picker_store.get_state();
                    let props = picker_props(&state, &self.dispatcher, self.block_weekends);
                    popover.handle_key(*key, &props, &self.locale);
                }
            }
            Action::PickerClick(pos) => {
                if let Some(popover) = self.popover.as_mut() {
                    let state = self.picker_store.get_state();
                    let props = picker_props(&state, &self.dispatcher, self.block_weekends);
                    popover.handle_click(*pos, &props, &self.locale);
                }
            }
            _ => {}
        }
    }
}
