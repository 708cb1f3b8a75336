//! Runtime assembly of mapper layouts from blueprints, plus the registry
//! that owns every built layout.
//!
//! A blueprint is a set of changes relative to an optional template layout.
//! Building resolves the template chain recursively, registering each
//! finished layout along the way; a blueprint seen twice before its layout
//! is registered is a template cycle and fails the whole build.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use padbridge_schemas::prelude::*;
use tracing::{debug, info, warn};

use crate::element::ElementMapper;
use crate::layout::{ActuatorMap, ElementMap, MapperLayout};

/// Owns every registered mapper layout, keyed by name.
///
/// The registry is an explicit value created by the embedding application
/// and threaded through; it is append-only once building finishes, and
/// lookups after that point are plain map reads with no synchronisation.
#[derive(Debug, Default)]
pub struct MapperRegistry {
    layouts: HashMap<String, Arc<MapperLayout>>,
}

impl MapperRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        MapperRegistry::default()
    }

    /// Registers a layout under its own name. Fails if the name is taken.
    pub fn register(&mut self, layout: MapperLayout) -> Result<Arc<MapperLayout>> {
        let name = layout.name().to_owned();
        if self.layouts.contains_key(&name) {
            return Err(Error::invalid_argument(
                "layout name",
                format!("'{name}' is already registered"),
            ));
        }
        let layout = Arc::new(layout);
        self.layouts.insert(name, Arc::clone(&layout));
        Ok(layout)
    }

    /// Layout registered under the given name, if any.
    pub fn get(&self, name: &str) -> Option<Arc<MapperLayout>> {
        self.layouts.get(name).cloned()
    }

    /// Whether a layout of the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Number of registered layouts.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether no layout is registered.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Names of every registered layout, unordered.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }
}

/// One layout under construction: an optional template plus per-element
/// overrides and build bookkeeping.
#[derive(Debug, Default)]
struct Blueprint {
    template: Option<String>,
    changes: BTreeMap<usize, ElementMapper>,
    build_attempted: bool,
    build_can_attempt: bool,
}

impl Blueprint {
    fn new() -> Self {
        Blueprint {
            build_can_attempt: true,
            ..Blueprint::default()
        }
    }
}

/// Assembles new mapper layouts at runtime, piece-wise.
#[derive(Debug, Default)]
pub struct MapperBuilder {
    blueprints: HashMap<String, Blueprint>,
}

impl MapperBuilder {
    /// Builder with no blueprints.
    pub fn new() -> Self {
        MapperBuilder::default()
    }

    /// Starts a new blueprint. Fails if a layout of that name is already
    /// registered or a blueprint of that name already exists.
    pub fn create_blueprint(&mut self, name: &str, registry: &MapperRegistry) -> Result<()> {
        if registry.contains(name) {
            return Err(Error::invalid_argument(
                "blueprint name",
                format!("layout '{name}' is already registered"),
            ));
        }
        if self.blueprints.contains_key(name) {
            return Err(Error::invalid_argument(
                "blueprint name",
                format!("blueprint '{name}' already exists"),
            ));
        }
        self.blueprints.insert(name.to_owned(), Blueprint::new());
        Ok(())
    }

    /// Whether a blueprint of the given name exists.
    pub fn has_blueprint(&self, name: &str) -> bool {
        self.blueprints.contains_key(name)
    }

    /// Overrides the mapper for one element of a blueprint.
    pub fn set_blueprint_element_mapper(
        &mut self,
        name: &str,
        element: PhysicalElement,
        mapper: ElementMapper,
    ) -> Result<()> {
        let blueprint = self.blueprint_mut(name)?;
        blueprint.changes.insert(element.index(), mapper);
        Ok(())
    }

    /// Removes a previously set element override from a blueprint. Fails if
    /// no override exists for that element.
    pub fn clear_blueprint_element_mapper(
        &mut self,
        name: &str,
        element: PhysicalElement,
    ) -> Result<()> {
        let blueprint = self.blueprint_mut(name)?;
        if blueprint.changes.remove(&element.index()).is_none() {
            return Err(Error::not_found(format!(
                "element override {element:?} in blueprint '{name}'"
            )));
        }
        Ok(())
    }

    /// Sets the template layout a blueprint starts from.
    pub fn set_blueprint_template(&mut self, name: &str, template: &str) -> Result<()> {
        let blueprint = self.blueprint_mut(name)?;
        blueprint.template = Some(template.to_owned());
        Ok(())
    }

    /// Template of the given blueprint, if one is set.
    pub fn blueprint_template(&self, name: &str) -> Option<&str> {
        self.blueprints
            .get(name)
            .and_then(|blueprint| blueprint.template.as_deref())
    }

    /// Marks a blueprint as invalid so its build can never be attempted.
    pub fn invalidate_blueprint(&mut self, name: &str) -> Result<()> {
        let blueprint = self.blueprint_mut(name)?;
        blueprint.build_can_attempt = false;
        Ok(())
    }

    /// Builds one blueprint, resolving and registering its template chain
    /// first, then registers and returns the finished layout.
    pub fn build(
        &mut self,
        name: &str,
        registry: &mut MapperRegistry,
    ) -> Result<Arc<MapperLayout>> {
        if !self.blueprints.contains_key(name) {
            warn!(mapper = name, "cannot build mapper: unrecognized name");
            return Err(Error::not_found(format!("blueprint '{name}'")));
        }
        if registry.contains(name) {
            warn!(
                mapper = name,
                "cannot build mapper: a layout with this name is already registered"
            );
            return Err(Error::invalid_argument(
                "mapper name",
                format!("layout '{name}' is already registered"),
            ));
        }

        {
            let blueprint = self.blueprint_mut(name)?;
            if !blueprint.build_can_attempt {
                warn!(mapper = name, "cannot build mapper: configuration is invalid");
                return Err(Error::invalid_argument(
                    "blueprint",
                    format!("configuration of '{name}' is invalid"),
                ));
            }
            if blueprint.build_attempted {
                // A second entry before registration means the template
                // chain looped back to this blueprint.
                warn!(mapper = name, "cannot build mapper: circular template dependency");
                return Err(Error::CycleInDependencies(name.to_owned()));
            }
            blueprint.build_attempted = true;
        }

        let template = self
            .blueprints
            .get(name)
            .and_then(|blueprint| blueprint.template.clone());

        let mut elements = match template {
            Some(template_name) => {
                if !registry.contains(&template_name) {
                    debug!(
                        mapper = name,
                        template = template_name.as_str(),
                        "template not yet registered, building it first"
                    );
                    self.build(&template_name, registry)?;
                }
                let template_layout = registry.get(&template_name).ok_or_else(|| {
                    Error::internal(format!(
                        "template '{template_name}' built successfully but is not registered"
                    ))
                })?;
                template_layout.clone_element_map()
            }
            None => ElementMap::new(),
        };

        let blueprint = self
            .blueprints
            .get(name)
            .ok_or_else(|| Error::internal(format!("blueprint '{name}' vanished during build")))?;
        for (index, mapper) in &blueprint.changes {
            let element = PhysicalElement::from_index(*index)?;
            elements.set(element, Some(mapper.clone()));
        }

        let layout = MapperLayout::new(name, elements, ActuatorMap::default());
        let layout = registry.register(layout)?;
        info!(mapper = name, "successfully built mapper");
        Ok(layout)
    }

    /// Builds every blueprint whose build has not been attempted and is not
    /// invalidated. Any failure aborts and propagates.
    pub fn build_all(&mut self, registry: &mut MapperRegistry) -> Result<()> {
        let mut names: Vec<String> = self.blueprints.keys().cloned().collect();
        names.sort();
        for name in names {
            let skip = self
                .blueprints
                .get(&name)
                .map(|blueprint| blueprint.build_attempted || !blueprint.build_can_attempt)
                .unwrap_or(true);
            if skip {
                continue;
            }
            self.build(&name, registry)?;
        }
        Ok(())
    }

    fn blueprint_mut(&mut self, name: &str) -> Result<&mut Blueprint> {
        self.blueprints
            .get_mut(name)
            .ok_or_else(|| Error::not_found(format!("blueprint '{name}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padbridge_schemas::elements::{VirtualAxis, VirtualButton};

    #[test]
    fn registry_rejects_duplicate_names() {
        let mut registry = MapperRegistry::new();
        registry
            .register(MapperLayout::with_default_actuators("Dup", ElementMap::new()))
            .expect("first registration succeeds");
        let err = registry
            .register(MapperLayout::with_default_actuators("Dup", ElementMap::new()))
            .expect_err("second registration fails");
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn create_blueprint_refuses_known_names() {
        let mut registry = MapperRegistry::new();
        registry
            .register(MapperLayout::with_default_actuators("Known", ElementMap::new()))
            .expect("registration succeeds");

        let mut builder = MapperBuilder::new();
        assert!(builder.create_blueprint("Known", &registry).is_err());
        assert!(builder.create_blueprint("Fresh", &registry).is_ok());
        assert!(builder.create_blueprint("Fresh", &registry).is_err());
    }

    #[test]
    fn clear_requires_existing_override() {
        let registry = MapperRegistry::new();
        let mut builder = MapperBuilder::new();
        builder
            .create_blueprint("Bp", &registry)
            .expect("blueprint created");
        assert!(builder
            .clear_blueprint_element_mapper("Bp", PhysicalElement::ButtonA)
            .is_err());
        builder
            .set_blueprint_element_mapper(
                "Bp",
                PhysicalElement::ButtonA,
                ElementMapper::button(VirtualButton::B1),
            )
            .expect("override set");
        assert!(builder
            .clear_blueprint_element_mapper("Bp", PhysicalElement::ButtonA)
            .is_ok());
    }

    #[test]
    fn build_from_scratch_applies_overrides() {
        let mut registry = MapperRegistry::new();
        let mut builder = MapperBuilder::new();
        builder
            .create_blueprint("Scratch", &registry)
            .expect("blueprint created");
        builder
            .set_blueprint_element_mapper(
                "Scratch",
                PhysicalElement::StickLeftX,
                ElementMapper::axis(VirtualAxis::X),
            )
            .expect("override set");

        let layout = builder
            .build("Scratch", &mut registry)
            .expect("build succeeds");
        assert!(layout.capabilities().has_axis(VirtualAxis::X));
        assert!(registry.contains("Scratch"));
    }

    #[test]
    fn build_seeds_from_template_clone() {
        let mut registry = MapperRegistry::new();
        let mut builder = MapperBuilder::new();

        builder
            .create_blueprint("Base", &registry)
            .expect("base blueprint");
        builder
            .set_blueprint_element_mapper(
                "Base",
                PhysicalElement::ButtonA,
                ElementMapper::button(VirtualButton::B1),
            )
            .expect("base override");

        builder
            .create_blueprint("Derived", &registry)
            .expect("derived blueprint");
        builder
            .set_blueprint_template("Derived", "Base")
            .expect("template set");
        builder
            .set_blueprint_element_mapper(
                "Derived",
                PhysicalElement::ButtonB,
                ElementMapper::button(VirtualButton::B2),
            )
            .expect("derived override");

        // Building the derived blueprint builds and registers the template.
        let layout = builder
            .build("Derived", &mut registry)
            .expect("derived build succeeds");
        assert!(registry.contains("Base"));
        assert_eq!(layout.capabilities().num_buttons, 2);
        assert_eq!(
            layout.element_map().get(PhysicalElement::ButtonA),
            Some(&ElementMapper::button(VirtualButton::B1))
        );
    }

    #[test]
    fn invalidated_blueprint_cannot_build() {
        let mut registry = MapperRegistry::new();
        let mut builder = MapperBuilder::new();
        builder
            .create_blueprint("Bad", &registry)
            .expect("blueprint created");
        builder.invalidate_blueprint("Bad").expect("invalidated");
        assert!(builder.build("Bad", &mut registry).is_err());
        assert!(!registry.contains("Bad"));
    }

    #[test]
    fn template_cycle_fails_and_registers_nothing() {
        let mut registry = MapperRegistry::new();
        let mut builder = MapperBuilder::new();
        builder.create_blueprint("A", &registry).expect("A created");
        builder.set_blueprint_template("A", "B").expect("A→B");
        builder.create_blueprint("B", &registry).expect("B created");
        builder.set_blueprint_template("B", "A").expect("B→A");

        let err = builder
            .build_all(&mut registry)
            .expect_err("cycle must fail");
        assert!(matches!(err, Error::CycleInDependencies(_)));
        assert!(!registry.contains("A"));
        assert!(!registry.contains("B"));
    }

    #[test]
    fn missing_template_blueprint_fails_build() {
        let mut registry = MapperRegistry::new();
        let mut builder = MapperBuilder::new();
        builder
            .create_blueprint("Orphan", &registry)
            .expect("blueprint created");
        builder
            .set_blueprint_template("Orphan", "Nowhere")
            .expect("template set");
        let err = builder
            .build("Orphan", &mut registry)
            .expect_err("missing template fails");
        assert!(matches!(err, Error::ObjectNotFound(_)));
    }

    #[test]
    fn build_all_skips_already_built_blueprints() {
        let mut registry = MapperRegistry::new();
        let mut builder = MapperBuilder::new();
        builder.create_blueprint("One", &registry).expect("created");
        builder
            .build("One", &mut registry)
            .expect("individual build succeeds");
        // A second sweep must not attempt "One" again and therefore succeeds.
        builder.build_all(&mut registry).expect("sweep succeeds");
        assert_eq!(registry.len(), 1);
    }
}
