//! End-to-end DTO to model mapping


use morphic_core::transform::{step, Chain, SequenceMapper};
use morphic_core::Error;
use test_support::{character_mapper, gimli, CharacterClass, CharacterDto, CharacterModel, Race};

#[test]
fn test_character_mapping() {
    let model = character_mapper()
        .map(&gimli())
        .expect("character sheet should map");

    assert_eq!(
        model,
        CharacterModel {
            full_name: "Gimli".to_string(),
            level: 12,
            hp: 85,
            is_npc: false,
            char_class: CharacterClass::Warrior,
            race: Race::Dwarf,
            items: vec!["axe".to_string(), "helmet".to_string(), "ale".to_string()],
        }
    );
}

#[test]
fn test_empty_inventory() {
    let mut dto = gimli();
    dto.inventory = String::new();

    let model = character_mapper().map(&dto).unwrap();
    assert!(model.items.is_empty());
}

#[test]
fn test_invalid_level_stops_mapping() {
    let mut dto = gimli();
    dto.level = "0".to_string();

    let mut model = CharacterModel::default();
    let err = character_mapper().map_into(&dto, &mut model).unwrap_err();

    assert_eq!(err.field(), Some("Level"));
    assert_eq!(err.step_index(), Some(2));
    assert_eq!(
        err.to_string(),
        "transform error [Level]: mapper chain failed at step 2: \
         validation failed for field \"Level\": level must be >= 1"
    );

    // Bindings before the failure were applied, later ones were not.
    assert_eq!(model.full_name, "Gimli");
    assert_eq!(model.level, 0);
    assert_eq!(model.hp, 0);
    assert_eq!(model.race, Race::Unknown);
}

#[test]
fn test_unknown_race() {
    let mut dto = gimli();
    dto.race = "hobbit".to_string();

    let err = character_mapper().map(&dto).unwrap_err();
    assert_eq!(err.field(), Some("Race"));
    assert!(matches!(
        err.root_cause(),
        Error::Conversion { message } if message == "unknown race: \"hobbit\""
    ));
}

#[test]
fn test_mapping_is_repeatable() {
    let mapper = character_mapper();
    let dto = gimli();
    assert_eq!(mapper.map(&dto).unwrap(), mapper.map(&dto).unwrap());
}

#[test]
fn test_mapper_describes_bindings() {
    let plan = character_mapper().describe();
    let pairs: Vec<(String, String)> = plan
        .iter()
        .map(|binding| (binding.source.to_string(), binding.target.to_string()))
        .collect();

    assert_eq!(pairs.len(), 7);
    assert_eq!(pairs[0], ("Name: String".to_string(), "FullName: String".to_string()));
    assert_eq!(pairs[6], ("Inventory: String".to_string(), "Items: Vec<String>".to_string()));
}

#[test]
fn test_party_mapping_through_chain() {
    let party = Chain::<Vec<CharacterDto>, Vec<CharacterModel>>::new(vec![step(
        SequenceMapper::lift(character_mapper()),
    )]);

    let mut orc = gimli();
    orc.name = "Azog".to_string();
    orc.race = "orc".to_string();

    let models = party.apply(vec![gimli(), orc.clone()]).unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[1].race, Race::Orc);

    orc.hp = "-5".to_string();
    let err = party.apply(vec![gimli(), orc]).unwrap_err();
    assert_eq!(err.step_index(), Some(1));
    assert_eq!(err.element_index(), Some(1));
    assert_eq!(err.field(), Some("HP"));
}
