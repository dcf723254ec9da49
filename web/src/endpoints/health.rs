/*  kokpit-auth: Reporting Portal Authenticator
 *  Copyright (C) 2023 The kokpit-auth developers
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use actix_web::web::Data;
use actix_web::HttpResponse;
use kokpit_auth_business::health::HealthChecker;
use tracing::instrument;

#[instrument(skip_all, name = "health")]
pub async fn get(checker: Data<HealthChecker>) -> HttpResponse {
    let statements = checker.execute_all().await;
    if statements.iter().all(|statement| statement.state) {
        HttpResponse::Ok().json(statements)
    } else {
        HttpResponse::ServiceUnavailable().json(statements)
    }
}
