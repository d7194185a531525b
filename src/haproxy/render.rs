//! HAProxy configuration rendering.
//!
//! # Responsibilities
//! - Turn an `ApplicationMap` into a complete `haproxy.cfg` document
//! - Emit the static preamble (global, defaults, stats)
//! - Emit one `listen` block per application that exposes a port
//!
//! The template environment is compiled once at startup and only read
//! afterwards. Rendering has no side effects.

use minijinja::value::Value;
use minijinja::{context, Environment, Error, ErrorKind, UndefinedBehavior};
use thiserror::Error as ThisError;
use crate::discovery::model::{sanitize_application_id, ApplicationMap};

const TEMPLATE_NAME: &str = "haproxy.cfg";
const HAPROXY_TEMPLATE: &str = include_str!("haproxy.cfg.j2");

/// The renderer itself is broken: bad template syntax or a template that
/// references data the model does not provide. Retrying cannot help.
#[derive(Debug, ThisError)]
#[error("HAProxy config template is defective: {0}")]
pub struct RenderError(#[from] Error);

/// Renders HAProxy configuration from discovered applications.
#[derive(Debug)]
pub struct ConfigRenderer {
    env: Environment<'static>,
}

impl ConfigRenderer {
    /// Compile the built-in template.
    pub fn new() -> Result<Self, RenderError> {
        Self::from_template(HAPROXY_TEMPLATE)
    }

    pub(crate) fn from_template(source: &'static str) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_filter("sanitize_id", |app_id: String| sanitize_application_id(&app_id));
        env.add_filter("port", application_port);
        env.add_test("exposing_ports", exposes_ports);
        env.add_template(TEMPLATE_NAME, source)?;

        Ok(Self { env })
    }

    /// Render the full configuration document.
    ///
    /// Applications are emitted in id order and instances in instance-id
    /// order, so equal maps always produce identical text.
    pub fn render(&self, apps: &ApplicationMap) -> Result<String, RenderError> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        let rendered = template.render(context! { applications => apps })?;
        Ok(rendered)
    }
}

/// First declared port of an application. Backend servers inherit it too.
fn application_port(app: Value) -> Result<Value, Error> {
    let port = app.get_attr("ports")?.get_item(&Value::from(0))?;
    if port.is_undefined() {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            "application exposes no ports",
        ));
    }
    Ok(port)
}

fn exposes_ports(app: Value) -> bool {
    app.get_attr("ports")
        .ok()
        .and_then(|ports| ports.len())
        .is_some_and(|len| len > 0)
}
