use crate::graph::CityId;

/// Display names of the cities, stored apart from the structural keys used by the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelRegistry {
    names: Vec<Option<String>>,
}

impl LabelRegistry {
    pub fn get(&self, city: CityId) -> Option<&str> {
        self.names.get(city.index()).and_then(|n| n.as_deref())
    }

    /// Sets the display name of the city, replacing any previous one.
    pub fn set(&mut self, city: CityId, name: String) {
        let index = city.index();
        if index >= self.names.len() {
            self.names.resize(index + 1, None);
        }
        self.names[index] = Some(name);
    }

    pub fn remove(&mut self, city: CityId) -> Option<String> {
        self.names.get_mut(city.index()).and_then(Option::take)
    }

    pub fn len(&self) -> usize {
        self.names.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
