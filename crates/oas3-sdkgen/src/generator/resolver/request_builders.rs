use oas3::spec::ObjectOrReference;
use tracing::trace;

use super::{InlineContext, ModelResolver, operations::operation_name, primitives::primitive_for};
use crate::{
  generator::{
    codedom::{
      Abstraction, Access, ClassKind, CodeType, CollectionKind, ElementId, ElementKind, IndexerDef, MethodDef,
      MethodKind, ParameterDef, ParameterKind, Primitive, PropertyDef, PropertyKind,
    },
    comparer::api_root_url,
    errors::GenerationResult,
    uri_space::{ITEM_NAMESPACE_SEGMENT, NodeId, PathParameterInfo},
  },
  naming::identifiers::{cleanup_symbol_name, ensure_unique, to_first_character_lower_case},
  utils::SchemaExt,
};

pub(crate) const REQUEST_BUILDER_SUFFIX: &str = "RequestBuilder";
pub(crate) const ITEM_REQUEST_BUILDER_SUFFIX: &str = "ItemRequestBuilder";
pub(crate) const URL_TEMPLATE_PROPERTY_NAME: &str = "urlTemplate";
pub(crate) const PATH_PARAMETERS_NAME: &str = "pathParameters";
pub(crate) const REQUEST_ADAPTER_NAME: &str = "requestAdapter";
pub(crate) const RAW_URL_NAME: &str = "rawUrl";
pub(crate) const CONSTRUCTOR_NAME: &str = "constructor";
pub(crate) const WITH_URL_METHOD_NAME: &str = "withUrl";
pub(crate) const INDEXER_SUFFIX: &str = "-indexer";

const BUILDER_MEMBER_NAMES: [&str; 5] = [
  URL_TEMPLATE_PROPERTY_NAME,
  PATH_PARAMETERS_NAME,
  REQUEST_ADAPTER_NAME,
  CONSTRUCTOR_NAME,
  WITH_URL_METHOD_NAME,
];

const CLIENT_DESCRIPTION: &str = "The main entry point of the SDK, exposes the configuration and the fluent API.";
const RAW_URL_DESCRIPTION: &str = "The raw URL to use for the request builder.";
const DEFAULT_INDEXER_DESCRIPTION: &str = "Unique identifier of the item";

/// Symbol for a path or query parameter: `user-id` becomes `userId`.
pub(crate) fn parameter_symbol(name: &str) -> String {
  to_first_character_lower_case(&cleanup_symbol_name(name))
}

impl ModelResolver<'_> {
  /// Declares the request builder of `id` and, depth first, of every node below it.
  pub(super) fn create_request_builder(&mut self, id: NodeId) -> GenerationResult<ElementId> {
    let node = self.tree.node(id);
    let is_client = node.is_root();
    let root_namespace = self.config.client_namespace_name.clone();

    let (namespace_name, class_name) = if is_client {
      (root_namespace, self.config.client_class_name.clone())
    } else {
      let suffix = if node.belongs_to_item_namespace() {
        ITEM_REQUEST_BUILDER_SUFFIX
      } else {
        REQUEST_BUILDER_SUFFIX
      };
      (
        self.tree.namespace_name(id, &root_namespace),
        self.tree.request_builder_class_name(id, suffix),
      )
    };

    let namespace = self.dom.find_or_add_namespace(&namespace_name)?;
    let class = self.declare_class(
      &InlineContext::new(namespace, class_name),
      ClassKind::RequestBuilder,
      None,
      None,
    )?;
    let description = if is_client {
      CLIENT_DESCRIPTION.to_string()
    } else {
      node.description().map_or_else(
        || format!("Builds and executes requests for operations under {}", node.path()),
        ToString::to_string,
      )
    };
    self.dom.document(class, Some(&description));
    self.dom.element_mut(class).deprecated = self.is_deprecated(id);
    self.stats.record_request_builder();
    trace!(class = %self.dom.qualified_name(class), path = node.path(), "creating request builder");

    for child in self.tree.node(id).children().collect::<Vec<_>>() {
      let child_class = self.create_request_builder(child)?;
      self.add_navigation(class, id, child, child_class)?;
    }

    self.add_url_management(class, id, is_client)?;

    let node = self.tree.node(id);
    if node.has_operations() {
      if !is_client {
        self.add_with_url(class, id)?;
      }
      for (method, operation) in node.operations() {
        self.create_operation_methods(id, class, &method, operation)?;
      }
    }
    Ok(class)
  }

  /// A node is deprecated when every one of its operations is.
  fn is_deprecated(&self, id: NodeId) -> bool {
    let operations = self.tree.node(id).operations();
    !operations.is_empty()
      && operations
        .iter()
        .all(|(_, operation)| operation.deprecated.unwrap_or(false))
  }

  fn add_navigation(&mut self, class: ElementId, parent: NodeId, child: NodeId, child_class: ElementId) -> GenerationResult<()> {
    let child_node = self.tree.node(child);
    let return_type = CodeType::definition(child_class).non_null();
    let deprecated = self.is_deprecated(child);

    if child_node.is_single_parameter_segment() {
      let name = format!("{}{INDEXER_SUFFIX}", self.tree.navigation_name(child, ""));
      let path_segment = self
        .tree
        .namespace_name(parent, "")
        .rsplit('.')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(ITEM_NAMESPACE_SEGMENT)
        .to_string();
      let indexer = self.dom.add_child(
        class,
        name,
        ElementKind::Indexer(IndexerDef {
          return_type,
          path_segment,
        }),
      )?;
      self.dom.document(indexer, Some("Gets an item from the collection"));
      self.dom.element_mut(indexer).deprecated = deprecated;

      let segment = child_node.segment();
      let info = self
        .tree
        .segment_parameters(child, self.spec)
        .into_iter()
        .next()
        .unwrap_or_else(|| PathParameterInfo {
          name: segment.trim_start_matches('{').trim_end_matches('}').to_string(),
          description: None,
          schema: None,
        });
      let mut def = ParameterDef::new(ParameterKind::Path, self.path_parameter_type(&info).non_null());
      def.serialization_name = Some(info.serialization_name());
      let parameter = self
        .dom
        .add_child(indexer, parameter_symbol(&info.name), ElementKind::Parameter(def))?;
      let description = info.description.as_deref().unwrap_or(DEFAULT_INDEXER_DESCRIPTION);
      self.dom.document(parameter, Some(description));
    } else if child_node.is_multi_parameter_segment() {
      let raw_name = cleanup_symbol_name(&self.tree.navigation_name(child, ""));
      let name = self.navigation_member_name(class, parent, &raw_name);
      let mut def = MethodDef::new(MethodKind::RequestBuilderWithParameters, return_type);
      def.target = Some(child_class);
      let method = self.dom.add_child(class, name, ElementKind::Method(def))?;
      let description = child_node.description().map_or_else(
        || format!("Builds and executes requests for operations under {}", child_node.path()),
        ToString::to_string,
      );
      self.dom.document(method, Some(&description));
      self.dom.element_mut(method).deprecated = deprecated;
      self.add_path_parameters(method, child, false)?;
    } else {
      let name = self.navigation_member_name(class, parent, &self.tree.navigation_name(child, ""));
      let description = child_node.description().map(ToString::to_string);
      let mut def = PropertyDef::new(PropertyKind::RequestBuilder, return_type);
      def.read_only = true;
      let property = self.dom.add_child(class, name, ElementKind::Property(def))?;
      self.dom.document(property, description.as_deref());
      self.dom.element_mut(property).deprecated = deprecated;
    }
    Ok(())
  }

  /// Navigation members are added first; they step aside for the members the builder
  /// declares afterwards for URL management and the node's operations.
  fn navigation_member_name(&self, class: ElementId, node: NodeId, name: &str) -> String {
    let operation_members = self
      .tree
      .node(node)
      .operations()
      .into_iter()
      .flat_map(|(method, _)| {
        [
          method.as_str().to_lowercase(),
          format!("to{}RequestInformation", operation_name(&method)),
        ]
      })
      .collect::<Vec<_>>();
    ensure_unique(name, |candidate| {
      BUILDER_MEMBER_NAMES.contains(&candidate)
        || operation_members.iter().any(|member| member == candidate)
        || self.dom.find_child_by_name(class, candidate).is_some()
    })
  }

  /// Parameters for the placeholders of the node's own segment.
  fn add_path_parameters(&mut self, method: ElementId, id: NodeId, optional: bool) -> GenerationResult<()> {
    for info in self.tree.segment_parameters(id, self.spec) {
      let name = parameter_symbol(&info.name);
      let mut def = ParameterDef::new(ParameterKind::Path, self.path_parameter_type(&info));
      def.optional = optional;
      if !name.eq_ignore_ascii_case(&info.name) {
        def.serialization_name = Some(info.serialization_name());
      }
      let parameter = self.dom.add_child(method, name, ElementKind::Parameter(def))?;
      self.dom.document(parameter, info.description.as_deref());
    }
    Ok(())
  }

  /// Path placeholders are expanded by RFC 6570 templates, so anything that is not a
  /// primitive travels as a string.
  fn path_parameter_type(&self, info: &PathParameterInfo) -> CodeType {
    let resolved = match &info.schema {
      Some(ObjectOrReference::Object(inline)) => Some(inline.clone()),
      Some(reference) => reference.resolve(self.spec).ok(),
      None => None,
    };
    let Some(schema) = resolved else {
      return CodeType::string();
    };
    if schema.is_array() {
      let items = schema
        .items_schema()
        .and_then(|items| items.resolve(self.spec).ok())
        .and_then(|items| primitive_for(&items))
        .unwrap_or(Primitive::String);
      return CodeType::primitive(items).collection_of(CollectionKind::Array);
    }
    primitive_for(&schema).map_or_else(CodeType::string, CodeType::primitive)
  }

  fn add_url_management(&mut self, class: ElementId, id: NodeId, is_client: bool) -> GenerationResult<()> {
    let mut url_template = PropertyDef::new(PropertyKind::UrlTemplate, CodeType::string().non_null());
    url_template.access = Access::Private;
    url_template.read_only = true;
    url_template.default_value = Some(self.tree.url_template(id, None, self.spec));
    let property = self
      .dom
      .add_child(class, URL_TEMPLATE_PROPERTY_NAME, ElementKind::Property(url_template))?;
    self.dom.document(
      property,
      Some("Url template to use to build the URL for the current request builder"),
    );

    let mut adapter = PropertyDef::new(
      PropertyKind::RequestAdapter,
      CodeType::abstraction(Abstraction::RequestAdapter),
    );
    adapter.access = Access::Private;
    adapter.read_only = true;
    let property = self
      .dom
      .add_child(class, REQUEST_ADAPTER_NAME, ElementKind::Property(adapter))?;
    self.dom.document(property, Some("The request adapter to use to execute the requests."));

    let mut path_parameters = PropertyDef::new(
      PropertyKind::PathParameters,
      CodeType::abstraction(Abstraction::PathParameters),
    );
    path_parameters.access = Access::Private;
    path_parameters.read_only = true;
    let property = self
      .dom
      .add_child(class, PATH_PARAMETERS_NAME, ElementKind::Property(path_parameters))?;
    self.dom.document(property, Some("Path parameters for the request"));

    let class_name = self.dom.name(class).to_string();
    let constructor_doc = format!("Instantiates a new {class_name} and sets the default values.");

    if is_client {
      let mut def = MethodDef::new(MethodKind::ClientConstructor, CodeType::void());
      def.base_url = self.config.api_root_url.clone().or_else(|| api_root_url(&self.spec.servers));
      let constructor = self.dom.add_child(class, CONSTRUCTOR_NAME, ElementKind::Method(def))?;
      self.dom.document(constructor, Some(&constructor_doc));
      self.add_request_adapter_parameter(constructor)?;
      if self.config.uses_backing_store {
        let mut def = ParameterDef::new(
          ParameterKind::BackingStore,
          CodeType::abstraction(Abstraction::BackingStoreFactory).with_nullable(true),
        );
        def.optional = true;
        let parameter = self.dom.add_child(constructor, "backingStore", ElementKind::Parameter(def))?;
        self.dom.document(parameter, Some("The backing store to use for the models."));
      }
      return Ok(());
    }

    let constructor = self.dom.add_child(
      class,
      CONSTRUCTOR_NAME,
      ElementKind::Method(MethodDef::new(MethodKind::Constructor, CodeType::void())),
    )?;
    self.dom.document(constructor, Some(&constructor_doc));
    let parameter = self.dom.add_child(
      constructor,
      PATH_PARAMETERS_NAME,
      ElementKind::Parameter(ParameterDef::new(
        ParameterKind::PathParameters,
        CodeType::abstraction(Abstraction::PathParameters),
      )),
    )?;
    self.dom.document(parameter, Some("Path parameters for the request"));
    self.add_path_parameters(constructor, id, true)?;
    self.add_request_adapter_parameter(constructor)?;

    let raw_constructor = self.dom.add_child(
      class,
      CONSTRUCTOR_NAME,
      ElementKind::Method(MethodDef::new(MethodKind::RawUrlConstructor, CodeType::void())),
    )?;
    self.dom.document(raw_constructor, Some(&constructor_doc));
    self.add_raw_url_parameter(raw_constructor)?;
    self.add_request_adapter_parameter(raw_constructor)?;
    Ok(())
  }

  fn add_request_adapter_parameter(&mut self, method: ElementId) -> GenerationResult<()> {
    let parameter = self.dom.add_child(
      method,
      REQUEST_ADAPTER_NAME,
      ElementKind::Parameter(ParameterDef::new(
        ParameterKind::RequestAdapter,
        CodeType::abstraction(Abstraction::RequestAdapter),
      )),
    )?;
    self.dom.document(parameter, Some("The request adapter to use to execute the requests."));
    Ok(())
  }

  fn add_raw_url_parameter(&mut self, method: ElementId) -> GenerationResult<()> {
    let parameter = self.dom.add_child(
      method,
      RAW_URL_NAME,
      ElementKind::Parameter(ParameterDef::new(ParameterKind::RawUrl, CodeType::string().non_null())),
    )?;
    self.dom.document(parameter, Some(RAW_URL_DESCRIPTION));
    Ok(())
  }

  fn add_with_url(&mut self, class: ElementId, id: NodeId) -> GenerationResult<()> {
    let mut def = MethodDef::new(MethodKind::RawUrlBuilder, CodeType::definition(class).non_null());
    def.target = Some(class);
    let method = self.dom.add_child(class, WITH_URL_METHOD_NAME, ElementKind::Method(def))?;
    self.dom.document(
      method,
      Some(
        "Returns a request builder with the provided arbitrary URL. Using this method means any other path or query \
         parameters are ignored.",
      ),
    );
    self.dom.element_mut(method).deprecated = self.is_deprecated(id);
    self.add_raw_url_parameter(method)
  }
}

