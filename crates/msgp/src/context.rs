//! [`Context`]: a registry, a scratch pool and their configuration.

use std::cell::RefCell;
use std::io::Read;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use crate::{Config, Message, Reader, Registry, ScratchPool};

static GLOBAL: OnceLock<Context> = OnceLock::new();

thread_local! {
    static ACTIVE: RefCell<Vec<Context>> = const { RefCell::new(Vec::new()) };
}

/// Shared state for Any envelope encoding and decoding.
///
/// Most programs use [`Context::global`]. The free functions in this crate
/// resolve through [`Context::current`], so Any fields nested inside a value
/// use the context that is encoding or decoding the enclosing envelope.
///
/// Clones share one registry and scratch pool. Contexts built separately
/// keep separate registries.
#[derive(Clone)]
pub struct Context {
    shared: Arc<Shared>,
}

struct Shared {
    registry: Registry,
    scratch: ScratchPool,
    config: Config,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Keeps a context active on the current thread; see [`Context::enter`].
#[must_use = "the context is only active while the guard is alive"]
pub struct ActiveContext<'c> {
    _context: PhantomData<&'c Context>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ActiveContext<'_> {
    fn drop(&mut self) {
        ACTIVE.with(|active| {
            active.borrow_mut().pop();
        });
    }
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            shared: Arc::new(Shared {
                registry: Registry::new(),
                scratch: ScratchPool::new(&config),
                config,
            }),
        }
    }

    /// The process-wide context, created with [`Config::default`] on first
    /// use.
    pub fn global() -> &'static Context {
        GLOBAL.get_or_init(Context::default)
    }

    /// Installs `config` for the global context.
    ///
    /// Returns `false` if the global context already exists, in which case it
    /// keeps its configuration.
    pub fn init_global(config: Config) -> bool {
        let mut installed = false;
        GLOBAL.get_or_init(|| {
            installed = true;
            Context::new(config)
        });
        installed
    }

    /// The innermost context entered on this thread, or the global one.
    pub fn current() -> Context {
        ACTIVE
            .with(|active| active.borrow().last().cloned())
            .unwrap_or_else(|| Context::global().clone())
    }

    /// Makes `self` the [current](Context::current) context of this thread
    /// until the guard drops. Guards nest.
    ///
    /// The envelope methods enter their context on their own. Enter it
    /// explicitly to run whole-message helpers such as
    /// [`marshal`](crate::marshal) against it.
    pub fn enter(&self) -> ActiveContext<'_> {
        ACTIVE.with(|active| active.borrow_mut().push(self.clone()));
        ActiveContext {
            _context: PhantomData,
            _not_send: PhantomData,
        }
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn registry(&self) -> &Registry {
        &self.shared.registry
    }

    pub(crate) fn scratch(&self) -> &ScratchPool {
        &self.shared.scratch
    }

    /// See [`Registry::register`].
    pub fn register<T: Message + Default>(&self, id: u16) {
        self.shared.registry.register::<T>(id);
    }

    /// A stream reader using the configured buffer size.
    pub fn reader<'r>(&self, source: impl Read + 'r) -> Reader<'r> {
        Reader::with_capacity(source, self.shared.config.stream_buffer_size)
    }
}
