//! Form field derivation: raw schema → ordered list of UI field descriptors.
//!
//! Derivation never fails. Unrecognized shapes degrade to a plain `text`
//! field. The uiType for each property is settled in this order, with later
//! steps able to override earlier ones:
//!
//! 1. declared type, plus the string `format` table or textarea hints;
//! 2. `enum` on a non-container property → `select`;
//! 3. image keywords, only if the field is still plain `text`;
//! 4. richtext format/keywords, which override whatever came before.
//!
//! Object properties also emit their children, flattened into the same list
//! under dotted names.
pub mod hints;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::Limits;
use crate::raw::{RawProp, join_path, render_display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UiType {
    Text,
    Textarea,
    Richtext,
    Email,
    Password,
    Url,
    Tel,
    Date,
    DatetimeLocal,
    Time,
    Color,
    Image,
    Number,
    Checkbox,
    Select,
    Multiselect,
    Array,
    Object,
}

impl UiType {
    /// String formats that map 1:1 onto an input type.
    pub fn from_format(format: &str) -> Option<Self> {
        match format {
            "email" => Some(Self::Email),
            "password" => Some(Self::Password),
            "textarea" => Some(Self::Textarea),
            "url" => Some(Self::Url),
            "tel" => Some(Self::Tel),
            "date" => Some(Self::Date),
            "datetime-local" => Some(Self::DatetimeLocal),
            "time" => Some(Self::Time),
            "color" => Some(Self::Color),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Richtext => "richtext",
            Self::Email => "email",
            Self::Password => "password",
            Self::Url => "url",
            Self::Tel => "tel",
            Self::Date => "date",
            Self::DatetimeLocal => "datetime-local",
            Self::Time => "time",
            Self::Color => "color",
            Self::Image => "image",
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for UiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    /// Dot-joined path of the property.
    pub name: String,
    #[serde(rename = "uiType")]
    pub ui_type: UiType,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FormField {
    fn new(name: String) -> Self {
        Self {
            name,
            ui_type: UiType::Text,
            label: String::new(),
            required: false,
            placeholder: None,
            options: None,
            value: None,
            format: None,
            description: None,
        }
    }
}

/// Fields plus the paths that need an image picker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedForm {
    pub fields: Vec<FormField>,
    pub image_fields: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, Default)]
pub struct FormDeriver {
    limits: Limits,
}

impl FormDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn derive(&self, schema: &Value) -> Vec<FormField> {
        self.derive_form(schema).fields
    }

    pub fn derive_form(&self, schema: &Value) -> DerivedForm {
        let mut emitter = Emitter { limits: self.limits, form: DerivedForm::default() };
        if let Some(props) = schema.get("properties").and_then(Value::as_object) {
            emitter.emit("", props, false, 1);
        }

        let mut form = emitter.form;
        // stable: equal priorities keep declaration order
        form.fields.sort_by_key(|f| hints::priority(&f.name));
        debug!(fields = form.fields.len(), images = form.image_fields.len(), "derived form");
        form
    }
}

pub fn derive_fields(schema: &Value) -> Vec<FormField> {
    FormDeriver::new().derive(schema)
}

pub fn derive_form(schema: &Value) -> DerivedForm {
    FormDeriver::new().derive_form(schema)
}

// ————————————————————————————————————————————————————————————————————————————
// EMISSION
// ————————————————————————————————————————————————————————————————————————————

struct Emitter {
    limits: Limits,
    form: DerivedForm,
}

impl Emitter {
    fn emit(&mut self, prefix: &str, props: &Map<String, Value>, nested: bool, depth: usize) {
        if self.limits.exceeded(depth) {
            warn!(prefix, max_depth = self.limits.max_depth, "form derivation stopped at depth limit");
            return;
        }
        for (name, raw) in props {
            let Some(prop) = RawProp::of(raw) else {
                continue;
            };
            let path = join_path(prefix, name);
            let field = self.field(path.clone(), name, prop, nested);
            let is_object = field.ui_type == UiType::Object;
            self.form.fields.push(field);

            if is_object {
                if let Some(children) = prop.object("properties") {
                    self.emit(&path, children, true, depth + 1);
                }
            }
        }
    }

    fn register_image(&mut self, path: &str) {
        self.form.image_fields.push(path.to_owned());
    }

    fn field(&mut self, path: String, name: &str, prop: RawProp<'_>, nested: bool) -> FormField {
        let mut f = FormField::new(path);

        f.label = prop.str("title").map(str::to_owned).unwrap_or_else(|| hints::field_label(name));
        if let Some(description) = prop.str("description") {
            f.description = Some(description.to_owned());
            f.placeholder = Some(description.to_owned());
        }
        f.value = prop.get("default").cloned();

        let declared = prop.type_name();
        match declared {
            Some("string") => {
                let format = prop.str("format").unwrap_or_default();
                f.ui_type = match UiType::from_format(format) {
                    Some(ui) => ui,
                    None if hints::wants_textarea(prop) => UiType::Textarea,
                    None => UiType::Text,
                };
                if f.ui_type == UiType::Image {
                    self.register_image(&f.name);
                }
                f.format = Some(format.to_owned()).filter(|s| !s.is_empty());
            }
            Some("number") => f.ui_type = UiType::Number,
            Some("integer") => {
                f.ui_type = UiType::Number;
                f.format = Some("integer".to_owned());
            }
            Some("boolean") => f.ui_type = UiType::Checkbox,
            Some("array") => array_field(&mut f, prop),
            Some("object") => f.ui_type = UiType::Object,
            _ => f.ui_type = UiType::Text,
        }

        f.required = prop.flag("required").unwrap_or(false) || prop.num("minLength").is_some_and(|n| n > 0.0);
        if f.ui_type == UiType::Number {
            number_placeholder(&mut f, prop);
        }

        if !matches!(declared, Some("array" | "object")) {
            if let Some(values) = prop.list("enum") {
                f.ui_type = UiType::Select;
                f.options = Some(values.iter().map(render_display).collect());
            }
        }

        if f.ui_type == UiType::Text && hints::wants_image(prop) {
            f.ui_type = UiType::Image;
            self.register_image(&f.name);
        }
        if hints::wants_richtext(prop) {
            f.ui_type = UiType::Richtext;
        }

        if nested {
            f.label = format!("  {}", f.label);
        }
        f
    }
}

fn array_field(f: &mut FormField, prop: RawProp<'_>) {
    f.ui_type = UiType::Array;
    let Some(items) = prop.object("items").map(RawProp) else {
        return;
    };
    let item_type = items.type_name();
    f.format = item_type.map(str::to_owned);
    if item_type == Some("string") {
        if let Some(values) = items.list("enum") {
            f.ui_type = UiType::Multiselect;
            f.options = Some(values.iter().map(render_display).collect());
        }
    }
}

fn number_placeholder(f: &mut FormField, prop: RawProp<'_>) {
    if let Some(min) = prop.num("minimum") {
        if f.placeholder.is_none() {
            f.placeholder = Some(format!("Minimum: {min:.0}"));
        }
    }
    if let Some(max) = prop.num("maximum") {
        match &mut f.placeholder {
            Some(text) => text.push_str(&format!(", Maximum: {max:.0}")),
            None => f.placeholder = Some(format!("Maximum: {max:.0}")),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
