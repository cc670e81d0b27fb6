use rutas::{RouteAttributes, RouteNetwork};

/// Southern Peru plus a disconnected river component in the Amazon.
///
/// ```text
///  Lima ---- Ica ---- Nazca ---- Cusco ---- Juliaca
///    \                  |          |          |
///     `-------------- Arequipa ----'         Puno
///                      |     `----------------'
///                    Tacna
///
///  Iquitos ~~~~ Pucallpa
/// ```
pub fn peru_network() -> RouteNetwork {
    let mut network = RouteNetwork::default();

    for city in [
        "Lima", "Ica", "Nazca", "Arequipa", "Cusco", "Puno", "Juliaca", "Tacna", "Iquitos",
        "Pucallpa",
    ] {
        network.add_city(city).unwrap();
    }

    let routes = [
        ("Lima", "Ica", 300.0, "paved", 240, 25.0),
        ("Ica", "Nazca", 140.0, "paved", 120, 10.0),
        ("Nazca", "Arequipa", 560.0, "paved", 480, 40.0),
        ("Lima", "Arequipa", 1010.0, "paved", 780, 120.0),
        ("Nazca", "Cusco", 650.0, "dirt", 840, 30.0),
        ("Arequipa", "Cusco", 510.0, "paved", 600, 35.0),
        ("Arequipa", "Puno", 290.0, "paved", 330, 20.0),
        ("Puno", "Juliaca", 45.0, "paved", 50, 5.0),
        ("Cusco", "Juliaca", 340.0, "paved", 390, 25.0),
        ("Arequipa", "Tacna", 370.0, "paved", 360, 30.0),
        ("Iquitos", "Pucallpa", 900.0, "river", 2880, 150.0),
    ];

    for (city1, city2, distance, kind, time, cost) in routes {
        network
            .connect(city1, city2, RouteAttributes::new(distance, kind, time, cost))
            .unwrap();
    }

    network
}

/// Asserts both networks have the same cities, labels and routes, regardless of their order.
pub fn assert_same_network(left: &RouteNetwork, right: &RouteNetwork) {
    let cities = |network: &RouteNetwork| {
        let mut cities: Vec<(String, String)> = network
            .cities()
            .map(|(key, name)| (key.to_string(), name.to_string()))
            .collect();
        cities.sort();
        cities
    };

    let routes = |network: &RouteNetwork| {
        let mut routes: Vec<([String; 2], RouteAttributes, bool)> = network
            .routes()
            .map(|route| {
                let mut endpoints = [route.city1.to_string(), route.city2.to_string()];
                endpoints.sort();
                (endpoints, route.attributes.clone(), route.active)
            })
            .collect();
        routes.sort_by(|a, b| a.0.cmp(&b.0));
        routes
    };

    assert_eq!(cities(left), cities(right));
    assert_eq!(routes(left), routes(right));
}
