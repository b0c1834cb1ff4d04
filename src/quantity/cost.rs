quantity!(Cost, suffix: "€", precision: 2);
