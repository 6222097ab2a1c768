// src/ui/params.rs
//! Debug parameter panels
//!
//! A demo declares its tunables as [`ParamSpec`]s in a [`ParamPanel`]. The
//! panel draws them grouped into collapsible folders and reports every
//! change as a [`ParamChanged`] event that the demo applies to its own
//! state in the same frame.
//!
//! ```rust
//! use cubist::ui::params::{ParamPanel, ParamValue};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Debug)]
//! enum Key { Speed }
//!
//! let mut panel = ParamPanel::new("Controls");
//! panel.slider(Key::Speed, "Cube/Transform", "Turn Speed", 10.0, 500.0, 10.0, 200.0);
//!
//! let change = panel.set(Key::Speed, ParamValue::Float(123.0)).unwrap();
//! assert_eq!(change.value, ParamValue::Float(120.0));
//! ```

/// Widget and value domain of a parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    Slider { min: f32, max: f32, step: f32 },
    Toggle,
    Choice(Vec<&'static str>),
    Button,
}

/// Current value of a parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Bool(bool),
    Index(usize),
    /// Buttons carry no value; the event itself is the press
    Pressed,
}

impl ParamValue {
    pub fn as_f32(self) -> Option<f32> {
        match self {
            ParamValue::Float(value) => Some(value),
            _ => None,
        }
    }
}

/// One GUI-bound parameter
#[derive(Debug, Clone)]
pub struct ParamSpec<K> {
    pub key: K,
    /// Folder path, `/`-separated, at most two levels deep
    pub folder: &'static str,
    pub label: &'static str,
    pub kind: ParamKind,
    value: ParamValue,
}

impl<K> ParamSpec<K> {
    pub fn value(&self) -> ParamValue {
        self.value
    }

    /// Brings `value` into this parameter's domain
    ///
    /// Slider values snap to the nearest step counted from `min`, then clamp
    /// to `[min, max]`. Returns `None` for values of the wrong kind.
    pub fn normalize(&self, value: ParamValue) -> Option<ParamValue> {
        match (&self.kind, value) {
            (ParamKind::Slider { min, max, step }, ParamValue::Float(raw)) => {
                Some(ParamValue::Float(quantize(raw, *min, *max, *step)))
            }
            (ParamKind::Toggle, ParamValue::Bool(_)) => Some(value),
            (ParamKind::Choice(options), ParamValue::Index(index)) => {
                (index < options.len()).then_some(value)
            }
            (ParamKind::Button, ParamValue::Pressed) => Some(value),
            _ => None,
        }
    }
}

/// Snaps to `step` relative to `min` and clamps to the range
pub fn quantize(value: f32, min: f32, max: f32, step: f32) -> f32 {
    let snapped = if step > 0.0 {
        min + ((value - min) / step).round() * step
    } else {
        value
    };
    snapped.clamp(min, max)
}

/// A change delivered to the panel's owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamChanged<K> {
    pub key: K,
    pub value: ParamValue,
}

/// An ImGui window of parameters keyed by `K`
pub struct ParamPanel<K> {
    title: String,
    params: Vec<ParamSpec<K>>,
}

impl<K: Copy + PartialEq> ParamPanel<K> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            params: Vec::new(),
        }
    }

    /// Adds a slider. The initial value is taken as given.
    #[allow(clippy::too_many_arguments)]
    pub fn slider(
        &mut self,
        key: K,
        folder: &'static str,
        label: &'static str,
        min: f32,
        max: f32,
        step: f32,
        initial: f32,
    ) -> &mut Self {
        self.push(
            key,
            folder,
            label,
            ParamKind::Slider { min, max, step },
            ParamValue::Float(initial),
        )
    }

    pub fn toggle(
        &mut self,
        key: K,
        folder: &'static str,
        label: &'static str,
        initial: bool,
    ) -> &mut Self {
        self.push(key, folder, label, ParamKind::Toggle, ParamValue::Bool(initial))
    }

    pub fn choice(
        &mut self,
        key: K,
        folder: &'static str,
        label: &'static str,
        options: Vec<&'static str>,
        initial: usize,
    ) -> &mut Self {
        self.push(
            key,
            folder,
            label,
            ParamKind::Choice(options),
            ParamValue::Index(initial),
        )
    }

    pub fn button(&mut self, key: K, folder: &'static str, label: &'static str) -> &mut Self {
        self.push(key, folder, label, ParamKind::Button, ParamValue::Pressed)
    }

    fn push(
        &mut self,
        key: K,
        folder: &'static str,
        label: &'static str,
        kind: ParamKind,
        value: ParamValue,
    ) -> &mut Self {
        self.params.push(ParamSpec {
            key,
            folder,
            label,
            kind,
            value,
        });
        self
    }

    pub fn params(&self) -> &[ParamSpec<K>] {
        &self.params
    }

    pub fn get(&self, key: K) -> Option<ParamValue> {
        self.params
            .iter()
            .find(|param| param.key == key)
            .map(|param| param.value)
    }

    /// Sets a parameter programmatically
    ///
    /// Returns the event to deliver, carrying the normalized value, or
    /// `None` when the key is unknown or the value has the wrong kind.
    pub fn set(&mut self, key: K, value: ParamValue) -> Option<ParamChanged<K>> {
        let param = self.params.iter_mut().find(|param| param.key == key)?;
        let value = param.normalize(value)?;
        if !matches!(value, ParamValue::Pressed) {
            param.value = value;
        }
        Some(ParamChanged { key, value })
    }

    /// Draws the panel in the top-right corner and returns this frame's changes
    pub fn render(&mut self, ui: &imgui::Ui) -> Vec<ParamChanged<K>> {
        let mut changes = Vec::new();
        let display_size = ui.io().display_size;
        if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
            return changes;
        }

        let width = 320.0;
        let title = self.title.clone();
        ui.window(&title)
            .position(
                [display_size[0] - width - 10.0, 10.0],
                imgui::Condition::FirstUseEver,
            )
            .size([width, 0.0], imgui::Condition::FirstUseEver)
            .always_auto_resize(true)
            .collapsible(true)
            .build(|| {
                for (top, subfolders) in folder_tree(&self.params) {
                    if !ui.collapsing_header(top, imgui::TreeNodeFlags::empty()) {
                        continue;
                    }
                    ui.indent();
                    for (sub, indices) in subfolders {
                        match sub {
                            Some(sub) => {
                                if let Some(_node) = ui.tree_node(sub) {
                                    for index in indices {
                                        changes.extend(self.draw_param(ui, index));
                                    }
                                }
                            }
                            None => {
                                for index in indices {
                                    changes.extend(self.draw_param(ui, index));
                                }
                            }
                        }
                    }
                    ui.unindent();
                }
            });

        changes
    }

    fn draw_param(&mut self, ui: &imgui::Ui, index: usize) -> Option<ParamChanged<K>> {
        let param = &self.params[index];
        let id = format!("{}##param{}", param.label, index);

        let edited = match (&param.kind, param.value) {
            (ParamKind::Slider { min, max, step }, ParamValue::Float(mut value)) => {
                let format = if *step >= 1.0 { "%.0f" } else { "%.2f" };
                ui.slider_config(&id, *min, *max)
                    .display_format(format)
                    .build(&mut value)
                    .then_some(ParamValue::Float(value))
            }
            (ParamKind::Toggle, ParamValue::Bool(mut value)) => ui
                .checkbox(&id, &mut value)
                .then_some(ParamValue::Bool(value)),
            (ParamKind::Choice(options), ParamValue::Index(mut value)) => ui
                .combo_simple_string(&id, &mut value, options)
                .then_some(ParamValue::Index(value)),
            (ParamKind::Button, _) => ui.button(&id).then_some(ParamValue::Pressed),
            _ => None,
        }?;

        let key = param.key;
        self.set(key, edited)
    }
}

type FolderGroups<'a> = Vec<(&'a str, Vec<(Option<&'a str>, Vec<usize>)>)>;

/// Groups parameter indices by folder, keeping declaration order
fn folder_tree<K>(params: &[ParamSpec<K>]) -> FolderGroups<'static> {
    let mut tree: FolderGroups<'static> = Vec::new();
    for (index, param) in params.iter().enumerate() {
        let (top, sub) = match param.folder.split_once('/') {
            Some((top, sub)) => (top, Some(sub)),
            None => (param.folder, None),
        };

        let position = match tree.iter().position(|(name, _)| *name == top) {
            Some(position) => position,
            None => {
                tree.push((top, Vec::new()));
                tree.len() - 1
            }
        };
        let subfolders = &mut tree[position].1;
        match subfolders.iter_mut().find(|(name, _)| *name == sub) {
            Some((_, indices)) => indices.push(index),
            None => subfolders.push((sub, vec![index])),
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Key {
        Speed,
        Strength,
        Bloom,
        Tone,
        Explode,
    }

    fn panel() -> ParamPanel<Key> {
        let mut panel = ParamPanel::new("Test");
        panel
            .slider(Key::Speed, "Cube/Transform", "Turn Speed", 10.0, 500.0, 10.0, 200.0)
            .toggle(Key::Bloom, "Post Processing/Bloom", "Enable", false)
            .slider(Key::Strength, "Post Processing/Bloom", "Strength", 0.0, 3.0, 0.01, 0.5)
            .choice(Key::Tone, "Tone Mapping", "Type", vec!["None", "Linear"], 0)
            .button(Key::Explode, "Cube", "Explode");
        panel
    }

    #[test]
    fn test_set_quantizes_then_clamps() {
        let mut panel = panel();

        let change = panel.set(Key::Speed, ParamValue::Float(234.0)).unwrap();
        assert_eq!(change.key, Key::Speed);
        assert_eq!(change.value, ParamValue::Float(230.0));

        let change = panel.set(Key::Speed, ParamValue::Float(9999.0)).unwrap();
        assert_eq!(change.value, ParamValue::Float(500.0));
        assert_eq!(panel.get(Key::Speed), Some(ParamValue::Float(500.0)));

        let change = panel.set(Key::Speed, ParamValue::Float(-20.0)).unwrap();
        assert_eq!(change.value, ParamValue::Float(10.0));
    }

    #[test]
    fn test_fine_steps() {
        let mut panel = panel();
        let value = panel
            .set(Key::Strength, ParamValue::Float(1.234_9))
            .and_then(|change| change.value.as_f32())
            .unwrap();
        assert!((value - 1.23).abs() < 1e-4);
    }

    #[test]
    fn test_wrong_kind_and_unknown_values_are_rejected() {
        let mut panel = panel();
        assert!(panel.set(Key::Bloom, ParamValue::Float(1.0)).is_none());
        assert!(panel.set(Key::Tone, ParamValue::Index(7)).is_none());
        assert_eq!(panel.get(Key::Bloom), Some(ParamValue::Bool(false)));
    }

    #[test]
    fn test_button_press_is_reported() {
        let mut panel = panel();
        let change = panel.set(Key::Explode, ParamValue::Pressed).unwrap();
        assert_eq!(change.value, ParamValue::Pressed);
    }

    #[test]
    fn test_folders_keep_declaration_order() {
        let panel = panel();
        let tree = folder_tree(panel.params());
        let names: Vec<&str> = tree.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["Cube", "Post Processing", "Tone Mapping"]);

        let (_, bloom) = &tree[1];
        assert_eq!(bloom.len(), 1);
        assert_eq!(bloom[0], (Some("Bloom"), vec![1, 2]));
    }
}
