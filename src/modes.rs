//! Built-in tokenizer modes and their standard compositions.

pub mod haskell;
pub mod plain;
pub mod routes;

use std::sync::Arc;

use crate::mode::{Mode, ModeConfig, ModeError, ModeRegistry};
use crate::multiplex::{ModeBinding, Multiplexer, Pattern};
use crate::style::Style;

pub use haskell::HaskellMode;
pub use plain::PlainMode;
pub use routes::RoutesMode;

/// Register the concrete modes plus the template compositions built on
/// top of them.
///
/// Registration order matters only within a multiplexer's bindings, but the
/// compositions can only be built after the modes they reference exist in
/// the registry.
pub fn register_builtins(registry: &mut ModeRegistry, config: ModeConfig) -> Result<(), ModeError> {
    registry.register(Arc::new(HaskellMode::new(config)));
    registry.register(Arc::new(RoutesMode));
    registry.register(Arc::new(PlainMode));

    let template = Arc::new(template_mode(registry)?);
    registry.register(template.clone());
    registry.register(Arc::new(yesod_mode(registry, template)?));
    Ok(())
}

/// Template-body mode: plain text with `#{..}`, `@{..}` and `^{..}`
/// interpolation regions tokenized as embedded expressions.
fn template_mode(registry: &ModeRegistry) -> Result<Multiplexer, ModeError> {
    let haskell = registry.resolve(haskell::MODE_NAME)?;
    let bindings = vec![ModeBinding::new(
        Pattern::regex(r"[#@^]\{")?,
        Pattern::literal("}"),
        haskell,
    )];
    Ok(Multiplexer::new("template", Arc::new(PlainMode), bindings))
}

/// Host-file mode: haskell source with quasiquoted route tables and
/// template blocks. Binding order encodes precedence; the final catch-all
/// quoter pattern must come last.
fn yesod_mode(registry: &ModeRegistry, template: Arc<dyn Mode>) -> Result<Multiplexer, ModeError> {
    let haskell = registry.resolve(haskell::MODE_NAME)?;
    let routes = registry.resolve(routes::MODE_NAME)?;
    let plain = registry.resolve(plain::MODE_NAME)?;

    let quoted = |open: Pattern, mode: Arc<dyn Mode>| {
        ModeBinding::new(open, Pattern::literal("|]"), mode)
            .delim_style(Some(Style::Delimiter))
    };

    let bindings = vec![
        quoted(Pattern::literal("[parseRoutes|"), routes),
        quoted(Pattern::regex(r"\[[iws]?hamlet\|")?, template.clone()),
        quoted(Pattern::literal("[lucius|"), template.clone()),
        quoted(Pattern::literal("[cassius|"), template.clone()),
        quoted(Pattern::literal("[julius|"), template),
        quoted(Pattern::regex(r"\[[^| ]+\|")?, plain),
    ];
    Ok(Multiplexer::new("yesod", haskell, bindings))
}
