/// A single day of the picker grid: its events, its style and the accessible
/// label it hangs on the calendar's cell node.
use crate::calendar::{DayModifiers, default_day_style};
use crate::node_tree::{NodeId, NodeKind, NodeTree};
use calpick_core::{Dated, Locale, events_on_day};
use chrono::NaiveDate;
use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

pub struct DayCell<'e, E: Dated> {
    pub date: NaiveDate,
    pub events: Vec<&'e E>,
}

impl<'e, E: Dated> DayCell<'e, E> {
    /// Cell for `date` holding the events that fall on it
    pub fn for_day(events: &'e [E], date: NaiveDate) -> Self {
        Self {
            date,
            events: events_on_day(events, date),
        }
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn label(&self, locale: &Locale) -> String {
        locale.day_label(self.date, self.event_count())
    }

    pub fn style(&self, modifiers: DayModifiers) -> Style {
        let style = default_day_style(modifiers);
        let style = if self.events.is_empty() || modifiers.selected || modifiers.blocked {
            style
        } else {
            style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
        };
        if modifiers.cursor {
            style.add_modifier(if modifiers.focused {
                Modifier::REVERSED
            } else {
                Modifier::BOLD
            })
        } else {
            style
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct AppliedLabel {
    event_count: usize,
    locale: String,
    label: String,
}

/// Remembers which label each day's contents node last wrote onto its
/// parent, so the label is only rewritten when the day's event count changes
/// or someone else overwrote it.
#[derive(Debug, Default)]
pub struct DayLabelEffects {
    applied: HashMap<NodeId, AppliedLabel>,
}

impl DayLabelEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label the parent of `contents` with the cell's description. Returns
    /// whether the tree was touched. A missing parent, or one that is not an
    /// element, is skipped without complaint.
    pub fn apply<E: Dated>(
        &mut self,
        contents: NodeId,
        cell: &DayCell<'_, E>,
        locale: &Locale,
        tree: &NodeTree,
    ) -> bool {
        let Some(parent) = tree.parent(contents).and_then(|p| tree.get(p)) else {
            log::trace!("No parent node for day {}, label skipped", cell.date);
            return false;
        };
        if parent.kind != NodeKind::Element {
            log::trace!("Parent of day {} is not an element, label skipped", cell.date);
            return false;
        }

        let event_count = cell.event_count();
        if let Some(previous) = self.applied.get(&contents) {
            if previous.event_count == event_count
                && previous.locale == locale.code()
                && parent.label.as_deref() == Some(previous.label.as_str())
            {
                return false;
            }
        }

        let label = cell.label(locale);
        tree.set_label(parent.id, label.clone());
        self.applied.insert(
            contents,
            AppliedLabel {
                event_count,
                locale: locale.code().to_string(),
                label,
            },
        );
        true
    }

    /// Forget nodes that have been unmounted
    pub fn prune(&mut self, tree: &NodeTree) {
        self.applied.retain(|id, _| tree.exists(*id));
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}
