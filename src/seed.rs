//! Demo content seeded on first boot.

use crate::domain::{CardContent, CardKind};
use crate::errors::Result;
use crate::store::SqliteStore;

pub fn seed_demo_content(store: &SqliteStore) -> Result<()> {
  if store.card_count()? > 0 {
    return Ok(());
  }

  let deck = store.create_deck("Animals", Some("A collection of common animals."))?;

  for card in get_animal_seed_data() {
    let card_id = store.insert_card(&card)?;
    store.add_card_to_deck(deck.id, card_id)?;
  }

  tracing::info!("seeded demo deck '{}'", deck.name);
  Ok(())
}

// Helper to create a basic English -> Portuguese card
fn card(prompt: &str, answer: &str, image_url: Option<&str>) -> CardContent {
  let mut c = CardContent::new(CardKind::Basic, prompt, answer);
  c.image_url = image_url.map(|s| s.to_string());
  c.lang = Some("en".to_string());
  c
}

fn get_animal_seed_data() -> Vec<CardContent> {
  vec![
    card("Dog", "Cachorro", Some("https://i.imgur.com/al5h69r.jpeg")),
    card("Cat", "Gato", Some("https://i.imgur.com/5i1qA4a.jpeg")),
    card("Lion", "Leão", Some("https://i.imgur.com/B1Yw33p.jpeg")),
    card("Tiger", "Tigre", Some("https://i.imgur.com/xT425vj.jpeg")),
    card("Bird", "Pássaro", None),
    card("Fish", "Peixe", None),
    card("Horse", "Cavalo", None),
    card("Bear", "Urso", None),
  ]
}
