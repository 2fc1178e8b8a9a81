use crate::error::{FormsiteError, Result};
use dashmap::DashMap;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

type Instance = Arc<dyn Any + Send + Sync>;

/// Casts a registered implementation into an `Arc<dyn Trait>` wrapped as `Any`.
/// Returns `None` when the instance is not of the bound implementation type.
type CasterFn = Arc<dyn Fn(Instance) -> Option<Instance> + Send + Sync>;

/// Thread-safe dependency injection container.
///
/// Providers are keyed by `TypeId`. Registering the same type twice replaces
/// the earlier instance, and binding a trait twice replaces the earlier
/// implementation, so tests can swap collaborators before controllers are
/// resolved.
#[derive(Clone)]
pub struct Container {
    services: DashMap<TypeId, Instance>,
    trait_mappings: DashMap<TypeId, TypeId>,
    casters: DashMap<TypeId, CasterFn>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
            trait_mappings: DashMap::new(),
            casters: DashMap::new(),
        }
    }

    pub fn register<T: 'static + Send + Sync>(&mut self, instance: T) -> &mut Self {
        tracing::debug!(provider = type_name::<T>(), "registering provider");
        self.services.insert(TypeId::of::<T>(), Arc::new(instance));
        self
    }

    pub fn register_trait<Trait, Impl, F>(&mut self, caster_fn: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        Impl: 'static + Send + Sync,
        F: Fn(Arc<Impl>) -> Arc<Trait> + 'static + Send + Sync,
    {
        tracing::debug!(
            contract = type_name::<Trait>(),
            implementation = type_name::<Impl>(),
            "binding contract"
        );
        let trait_id = TypeId::of::<Trait>();
        self.trait_mappings.insert(trait_id, TypeId::of::<Impl>());

        let caster: CasterFn = Arc::new(move |instance: Instance| {
            let concrete = instance.downcast::<Impl>().ok()?;
            let trait_obj: Arc<Trait> = caster_fn(concrete);
            Some(Arc::new(trait_obj) as Instance)
        });
        self.casters.insert(trait_id, caster);
        self
    }

    pub fn resolve<T: 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let instance = self
            .services
            .get(&TypeId::of::<T>())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| FormsiteError::DependencyNotFound {
                type_name: type_name::<T>().to_string(),
            })?;

        instance
            .downcast::<T>()
            .map_err(|_| FormsiteError::DowncastFailed {
                type_name: type_name::<T>().to_string(),
            })
    }

    pub fn resolve_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let trait_id = TypeId::of::<T>();

        let caster = self
            .casters
            .get(&trait_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| FormsiteError::DependencyNotFound {
                type_name: type_name::<T>().to_string(),
            })?;

        let impl_id = *self.trait_mappings.get(&trait_id).ok_or_else(|| {
            FormsiteError::DependencyNotFound {
                type_name: format!("No implementation bound for '{}'", type_name::<T>()),
            }
        })?;

        let instance = self
            .services
            .get(&impl_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| FormsiteError::DependencyNotFound {
                type_name: format!("Implementation for '{}' not registered", type_name::<T>()),
            })?;

        let downcast_failed = || FormsiteError::DowncastFailed {
            type_name: type_name::<T>().to_string(),
        };

        // The caster hands back an Arc<dyn Any> holding an Arc<T>.
        let wrapper = caster(instance)
            .ok_or_else(downcast_failed)?
            .downcast::<Arc<T>>()
            .map_err(|_| downcast_failed())?;
        Ok(wrapper.as_ref().clone())
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        let type_id = TypeId::of::<T>();
        self.services.contains_key(&type_id) || self.trait_mappings.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".into()
        }
    }

    struct French;

    impl Greeter for French {
        fn greet(&self) -> String {
            "bonjour".into()
        }
    }

    struct Port(u16);

    #[test]
    fn resolves_registered_instance() {
        let mut container = Container::new();
        container.register(Port(8000));
        assert_eq!(container.resolve::<Port>().unwrap().0, 8000);
        assert!(container.contains::<Port>());
    }

    #[test]
    fn resolve_returns_the_same_shared_instance() {
        let mut container = Container::new();
        container.register(Port(1));
        let a = container.resolve::<Port>().unwrap();
        let b = container.resolve::<Port>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn missing_dependency_is_an_error() {
        let container = Container::new();
        let err = container.resolve::<Port>().err().unwrap();
        assert!(matches!(err, FormsiteError::DependencyNotFound { .. }));
        assert!(container.resolve_trait::<dyn Greeter>().is_err());
    }

    #[test]
    fn rebinding_a_contract_replaces_the_implementation() {
        let mut container = Container::new();
        container.register(English);
        container.register_trait::<dyn Greeter, English, _>(|g| g as Arc<dyn Greeter>);
        assert_eq!(container.resolve_trait::<dyn Greeter>().unwrap().greet(), "hello");

        container.register(French);
        container.register_trait::<dyn Greeter, French, _>(|g| g as Arc<dyn Greeter>);
        assert_eq!(container.resolve_trait::<dyn Greeter>().unwrap().greet(), "bonjour");
        assert!(container.contains::<dyn Greeter>());
    }

    #[test]
    fn bound_contract_without_instance_is_reported() {
        let mut container = Container::new();
        container.register_trait::<dyn Greeter, English, _>(|g| g as Arc<dyn Greeter>);
        let err = container.resolve_trait::<dyn Greeter>().err().unwrap();
        assert!(err.to_string().contains("not registered"));
    }
}
