//! Run lifecycle
//!
//! A [`WorldHandle`] owns the engine for as long as a world is live. There
//! is no ambient "current world": whoever started a world holds its handle
//! and threads it into `stop` or `restart`.

use std::fmt;

use tracing::debug;

use super::{BodyIndex, Engine, HydrateOptions, Hydrator};
use crate::config::SceneConfig;
use crate::context::EvalContext;
use crate::error::{HydrateError, SceneError};
use crate::eval::eval_program;
use crate::frontend::SceneFrontend;
use crate::value::Scene;

// ═══════════════════════════════════════════════════════════════════════
// WORLD HANDLE
// ═══════════════════════════════════════════════════════════════════════

/// A live, hydrated world.
#[derive(Debug)]
pub struct WorldHandle<E: Engine> {
    engine: E,
    index: BodyIndex,
    hydrator: Hydrator,
}

impl<E: Engine> WorldHandle<E> {
    /// Hydrate `scene` into `engine` and take ownership of the result.
    ///
    /// Endpoints are validated before the engine is touched, and an engine
    /// failure mid-hydration tears the partial world down, so a failed start
    /// never leaves a half-built world behind.
    ///
    /// # Errors
    ///
    /// Returns the `HydrateError` that stopped hydration.
    pub fn start(engine: E, scene: &Scene, options: HydrateOptions) -> Result<Self, HydrateError> {
        Self::launch(engine, scene, Hydrator::new(options)).map_err(|(error, _)| error)
    }

    fn launch(
        mut engine: E,
        scene: &Scene,
        hydrator: Hydrator,
    ) -> Result<Self, (HydrateError, E)> {
        if let Err(error) = hydrator.check(scene) {
            return Err((error, engine));
        }
        match hydrator.hydrate(&mut engine, scene) {
            Ok(index) => {
                debug!(bodies = index.len(), "world started");
                Ok(Self {
                    engine,
                    index,
                    hydrator,
                })
            }
            Err(error) => {
                engine.teardown();
                Err((error, engine))
            }
        }
    }

    /// Tear the world down and hand the engine back.
    pub fn stop(mut self) -> E {
        self.engine.teardown();
        debug!("world stopped");
        self.engine
    }

    /// Replace the running world with `scene`.
    ///
    /// The new scene is validated first; if that fails the current world
    /// keeps running and comes back inside [`RestartError::Rejected`].
    /// Otherwise the current world is torn down before the new one is
    /// hydrated.
    ///
    /// # Errors
    ///
    /// - `Rejected` if validation fails (previous world untouched)
    /// - `Failed` if the engine fails after teardown (engine returned empty)
    pub fn restart(self, scene: &Scene) -> Result<Self, RestartError<E>> {
        if let Err(error) = self.hydrator.check(scene) {
            return Err(RestartError::Rejected {
                error,
                previous: self,
            });
        }

        let hydrator = self.hydrator.clone();
        let engine = self.stop();
        Self::launch(engine, scene, hydrator)
            .map_err(|(error, engine)| RestartError::Failed { error, engine })
    }

    /// The engine holding the live world.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Handles of every hydrated body.
    pub fn index(&self) -> &BodyIndex {
        &self.index
    }

    /// Hydration settings for this world and its restarts.
    pub fn options(&self) -> &HydrateOptions {
        self.hydrator.options()
    }
}

/// Why a restart did not produce a new world.
#[derive(Debug)]
pub enum RestartError<E: Engine> {
    /// The new scene failed validation; the previous world is still live
    Rejected {
        /// Validation failure
        error: HydrateError,
        /// The untouched previous world
        previous: WorldHandle<E>,
    },

    /// The engine failed after the previous world was torn down
    Failed {
        /// Engine failure
        error: HydrateError,
        /// The engine, empty
        engine: E,
    },
}

impl<E: Engine> RestartError<E> {
    /// The underlying hydration error.
    pub fn error(&self) -> &HydrateError {
        match self {
            RestartError::Rejected { error, .. } | RestartError::Failed { error, .. } => error,
        }
    }

    /// Discard the world or engine and keep only the error.
    pub fn into_error(self) -> HydrateError {
        match self {
            RestartError::Rejected { error, .. } | RestartError::Failed { error, .. } => error,
        }
    }
}

impl<E: Engine> fmt::Display for RestartError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartError::Rejected { error, .. } => {
                write!(f, "restart rejected, previous world kept: {}", error)
            }
            RestartError::Failed { error, .. } => {
                write!(f, "restart failed after teardown: {}", error)
            }
        }
    }
}

impl<E: Engine + fmt::Debug> std::error::Error for RestartError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SESSION
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug)]
enum Slot<E: Engine> {
    Idle(E),
    Running(WorldHandle<E>),
}

/// Source-to-world driver: parse, normalize, evaluate, then restart.
///
/// Each `run` replaces the previous world (last write wins). Failures before
/// hydration leave the running world untouched.
///
/// # Example
///
/// ```
/// use physcene::config::SceneConfig;
/// use physcene::frontends::TextFrontend;
/// use physcene::hydrate::{SceneWorld, Session};
///
/// let mut session =
///     Session::new(TextFrontend::new(), SceneWorld::new(), SceneConfig::default());
/// session.run("a: circle 0 0 5; b: circle 20 0 5; a ~~ b;").unwrap();
///
/// let world = session.engine().unwrap();
/// assert_eq!(world.bodies().len(), 2);
/// assert_eq!(world.constraints().len(), 1);
/// ```
#[derive(Debug)]
pub struct Session<F: SceneFrontend, E: Engine> {
    frontend: F,
    config: SceneConfig,
    context: EvalContext,
    // `None` only if a previous run panicked mid-restart
    slot: Option<Slot<E>>,
}

impl<F: SceneFrontend, E: Engine> Session<F, E> {
    /// Create an idle session around an empty engine.
    pub fn new(frontend: F, engine: E, config: SceneConfig) -> Self {
        let context = config.context();
        Self {
            frontend,
            config,
            context,
            slot: Some(Slot::Idle(engine)),
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Evaluation context; clone its `interrupt` flag to cancel a run.
    pub fn context(&self) -> &EvalContext {
        &self.context
    }

    /// The live world, if a run has succeeded.
    pub fn world(&self) -> Option<&WorldHandle<E>> {
        match &self.slot {
            Some(Slot::Running(world)) => Some(world),
            _ => None,
        }
    }

    /// The engine, whether a world is live or not.
    pub fn engine(&self) -> Option<&E> {
        match &self.slot {
            Some(Slot::Running(world)) => Some(world.engine()),
            Some(Slot::Idle(engine)) => Some(engine),
            None => None,
        }
    }

    /// Run `source`, replacing the current world.
    ///
    /// A pending interrupt left over from an earlier run is cleared first.
    ///
    /// # Errors
    ///
    /// Returns the parse, normalize, eval, or hydrate failure. Only a
    /// hydrate failure after teardown leaves the session without a world.
    pub fn run(&mut self, source: &str) -> Result<Scene, SceneError> {
        let program = self.frontend.parse_program(source)?;
        self.context.reset_interrupt();
        let scene = eval_program(&program, &self.context.next_run())?;

        let slot = self
            .slot
            .take()
            .ok_or_else(|| HydrateError::Engine("session engine was lost".to_string()))?;

        let (slot, outcome) = match slot {
            Slot::Idle(engine) => {
                let hydrator = Hydrator::new(self.config.hydrate.clone());
                match WorldHandle::launch(engine, &scene, hydrator) {
                    Ok(world) => (Slot::Running(world), Ok(())),
                    Err((error, engine)) => (Slot::Idle(engine), Err(error)),
                }
            }
            Slot::Running(world) => match world.restart(&scene) {
                Ok(world) => (Slot::Running(world), Ok(())),
                Err(RestartError::Rejected { error, previous }) => {
                    (Slot::Running(previous), Err(error))
                }
                Err(RestartError::Failed { error, engine }) => (Slot::Idle(engine), Err(error)),
            },
        };
        self.slot = Some(slot);

        outcome?;
        debug!(
            frontend = self.frontend.name(),
            bodies = scene.body_count(),
            constraints = scene.constraint_count(),
            "session run complete"
        );
        Ok(scene)
    }

    /// Tear down the live world, if any, keeping the engine.
    pub fn stop(&mut self) {
        self.slot = self.slot.take().map(|slot| match slot {
            Slot::Running(world) => Slot::Idle(world.stop()),
            idle => idle,
        });
    }

    /// Consume the session, returning the engine after teardown.
    pub fn into_engine(self) -> Option<E> {
        match self.slot {
            Some(Slot::Running(world)) => Some(world.stop()),
            Some(Slot::Idle(engine)) => Some(engine),
            None => None,
        }
    }
}
