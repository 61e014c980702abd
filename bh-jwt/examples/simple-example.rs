// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use bh_jwa::{generate_key_pair, generate_secret_key, KeySize, SigningAlgorithm};
use bh_jwt::{TokenBuilder, TokenParser};

fn main() {
    hmac_token();
    println!("=====================================================================");
    rsa_token();
}

fn hmac_token() {
    let secret = generate_secret_key(SigningAlgorithm::Hs256).unwrap();

    let token = TokenBuilder::new()
        .algorithm(SigningAlgorithm::Hs256)
        .secret_key(&secret)
        .issuer("https://issuer.example.com")
        .subject("user-17")
        .audience("https://api.example.com")
        .expiration(1983000000)
        .claim("admin", true)
        .build()
        .unwrap();

    println!("HS256 token:\n{}\n", token);

    let parser = TokenParser::from_secret_key(&secret);
    let claims = parser.payload(&token).unwrap();

    println!("issuer:  {:?}", claims.issuer().unwrap());
    println!("subject: {:?}", claims.subject().unwrap());
    println!("admin:   {:?}", claims.boolean("admin").unwrap());
}

fn rsa_token() {
    let pair = generate_key_pair(SigningAlgorithm::Rs256, KeySize::Low).unwrap();

    let token = TokenBuilder::new()
        .algorithm(SigningAlgorithm::Rs256)
        .private_key(pair.private_key())
        .issuer("https://issuer.example.com")
        .subject("user-17")
        .expiration(1983000000)
        .build()
        .unwrap();

    println!("RS256 token:\n{}\n", token);

    let parser = TokenParser::from_public_key(pair.public_key());
    let header = parser.header(&token).unwrap();

    println!("header alg: {}", header.alg);
    println!("header typ: {}", header.typ);
}
