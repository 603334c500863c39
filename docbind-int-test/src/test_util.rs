use docbind::common::Value;
use docbind::doc;
use docbind::errors::DocbindResult;
use docbind::model::Model;
use docbind::schema::{ModelType, TypeRegistry};

/// Registers the shared fixture types used across the integration tests.
///
/// The fixture models a small social domain: a dynamic `Person` with
/// localized fields, an embedded `Name` with its own embedded translations,
/// polymorphic `Address`/`ShipmentAddress` children and referenced `Game`
/// and `Post` documents. `Area` nests embedded children three levels deep,
/// and `Canvas` embeds a hierarchy with a customized discriminator.
pub fn fixture_registry() -> DocbindResult<TypeRegistry> {
    let registry = TypeRegistry::new();

    registry.register(
        ModelType::builder("Person")
            .field("title")
            .field("version")
            .field_with_default("age", Value::I32(100))
            .localized_field("desc")
            .embeds_one("name", "Name")
            .embeds_many("addresses", "Address")
            .references_one("game", "Game")
            .references_many("posts", "Post")
            .dynamic_attributes(true),
    )?;
    registry.register(
        ModelType::builder("Name")
            .field("first_name")
            .embeds_many("translations", "Translation"),
    )?;
    registry.register(ModelType::builder("Translation").field("language"))?;
    registry.register(
        ModelType::builder("Address")
            .field("street")
            .localized_field("name"),
    )?;
    registry.register(
        ModelType::builder("ShipmentAddress")
            .extends("Address")
            .localized_field("shipping_name"),
    )?;
    registry.register(ModelType::builder("Game").field("name"))?;
    registry.register(ModelType::builder("Post").field("text"))?;

    // three levels of embedded nesting
    registry.register(
        ModelType::builder("Area")
            .field("name")
            .embeds_many("locations", "Location")
            .embeds_many("influencers", "Influencer"),
    )?;
    registry.register(
        ModelType::builder("Location")
            .field("name")
            .embeds_many("buildings", "Building"),
    )?;
    registry.register(ModelType::builder("Building").field("address"))?;
    registry.register(ModelType::builder("Influencer").field("handle"))?;
    registry.register(
        ModelType::builder("Youtuber")
            .extends("Influencer")
            .field("channel"),
    )?;

    // customized discriminator key and value
    registry.register(
        ModelType::builder("Canvas")
            .field("title")
            .embeds_many("shapes", "Shape"),
    )?;
    registry.register(
        ModelType::builder("Shape")
            .field("kind")
            .discriminator_key("dkey"),
    )?;
    registry.register(
        ModelType::builder("Circle")
            .extends("Shape")
            .discriminator_value("dvalue")
            .field("radius"),
    )?;

    // legacy-field scenarios
    registry.register(ModelType::builder("Reg").field("title"))?;
    registry.register(
        ModelType::builder("Dyn")
            .field("title")
            .dynamic_attributes(true),
    )?;

    Ok(registry)
}

/// Builds a person with one embedded address per given street, in order.
pub fn person_with_addresses(
    registry: &TypeRegistry,
    streets: &[&str],
) -> DocbindResult<Model> {
    let person = registry.get("Person")?;
    let address = registry.get("Address")?;
    let mut model = Model::new(person, doc!("title": "Sir"))?;
    for street in streets {
        let child = Model::new(address.clone(), doc!("street": (*street)))?;
        model.push_embedded("addresses", child)?;
    }
    Ok(model)
}
